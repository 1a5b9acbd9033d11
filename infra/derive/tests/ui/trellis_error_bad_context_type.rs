use trellis_derive::trellis_error;

#[trellis_error]
pub enum DemoError {
    #[error("Internal error: {message}")]
    Internal { message: String, context: String },
}

fn main() {}
