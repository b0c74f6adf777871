mod identity_roundtrip;
mod symmetric_roundtrip;
mod zkp_roundtrip;
