pub mod early_shocks;
pub mod possession;
pub mod q1_window;
pub mod travel;
