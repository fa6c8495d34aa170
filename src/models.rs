//! Public Twine models.
//!
//! Models wrap the numeric engine in [`crate::support::thermo`] behind typed
//! [`uom`] quantities. Each [`twine_core::Model`] implementation is a thin
//! adapter: it validates and converts its input, delegates to the engine, and
//! turns a `NaN` result into an error.
//!
//! Bulk array work belongs in [`crate::dispatch`]; models evaluate one parcel
//! per call.

pub mod atmosphere;
