use std::borrow::Cow;
use trellis_derive::trellis_error;

#[trellis_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<(), DemoError> {
    Err::<(), _>(std::io::Error::other("disk")).context("reading catalog")?;
    Ok(())
}

fn main() {
    let err = read().unwrap_err();
    assert_eq!(err.to_string(), "IO error (reading catalog): disk");

    let internal: DemoError = "plain".into();
    assert_eq!(internal.to_string(), "Internal error: plain");

    let owned = Err::<(), DemoError>(DemoError::from(String::from("owned"))).context("late").unwrap_err();
    assert_eq!(owned.to_string(), "Internal error (late): owned");
}
