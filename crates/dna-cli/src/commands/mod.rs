pub mod dispatch;
pub mod object;
pub mod publish;
pub mod step;
