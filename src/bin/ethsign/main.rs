//! Main entry point for ethsign

#![deny(warnings, missing_docs, trivial_casts, unused_qualifications)]
#![forbid(unsafe_code)]

use ethsign::application::APP;

/// Boot ethsign
fn main() {
    abscissa_core::boot(&APP);
}
