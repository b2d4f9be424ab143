//! Curve engine implementations for the [`CurveEngine`](crate::engine::CurveEngine)
//! contract. Each backend lives behind its own cargo feature; the crate root
//! binds one of them as `DefaultEngine`.

#[cfg(feature = "arkworks")]
pub mod arkworks;

#[cfg(feature = "blst")]
pub mod blst;
