pub mod cost;
pub mod session;
pub mod turn;
