//! The error type of this crate.
//!
//! All failures are caller misconfiguration and are reported synchronously at construction time.
//! Traversing a constructed selector never fails: running out of input ends the output sequence.

use error_chain::error_chain;

error_chain! {
    errors {
        /// A hasher or selector was constructed with inconsistent parameters.
        InvalidArgument(message: String) {
            description("invalid argument")
            display("invalid argument: {}", message)
        }
    }
}
