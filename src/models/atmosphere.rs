//! Atmospheric models.

pub mod parcel;
