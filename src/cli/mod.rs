pub mod batch_cmd;
pub mod estimate_cmd;
pub mod interactive_cmd;
pub mod output;
pub mod renderer;
