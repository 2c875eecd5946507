pub mod rolling_encoder;
pub mod symbol_encoder;
