use trellis_derive::trellis_error;

#[trellis_error]
pub enum DemoError {
    #[error("IO error: {source}")]
    Io { source: std::io::Error },
}

fn main() {}
