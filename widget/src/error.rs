use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unterminated template tag starting at byte {0}")]
    Unterminated(usize),
    #[error("empty template tag at byte {0}")]
    EmptyTag(usize),
    #[error("invalid field name `{0}`")]
    InvalidField(String),
    #[error("only `<%=` and `<%-` tags are supported (byte {0})")]
    UnsupportedTag(usize),
}

#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("page is missing required element `{0}`")]
    MissingElement(String),
    #[error("invalid selector `{0}`")]
    InvalidSelector(String),
    #[error(transparent)]
    Template(#[from] TemplateError),
}
