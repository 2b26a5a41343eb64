//! Operation results
//!
//! Operations return a [`QueryResult`]. Besides plain items, a result can be
//! a status result (an HTTP style status code with a payload) or a host
//! specific wrapper implementing [`ResultAdapter`], unwrapped recursively.

use std::fmt;

use crate::reflect::{JsonValue, Record};

/// Host wrapper converting itself into a plainer result
pub trait ResultAdapter: Send {
    fn convert(self: Box<Self>) -> QueryResult;
}

/// Payload of a status result
pub enum StatusPayload {
    None,
    Text(String),
    Item(Box<dyn Record>),
    Items(Vec<Box<dyn Record>>),
}

impl StatusPayload {
    /// Text used in error messages
    pub fn to_text(&self) -> String {
        match self {
            StatusPayload::None => String::new(),
            StatusPayload::Text(text) => text.clone(),
            StatusPayload::Item(item) => item.to_json().to_string(),
            StatusPayload::Items(items) => {
                JsonValue::Array(items.iter().map(|item| item.to_json()).collect()).to_string()
            }
        }
    }
}

/// Result with a status code and a payload
pub struct StatusResult {
    pub status_code: Option<u16>,
    pub payload: StatusPayload,
}

impl StatusResult {
    pub fn is_success(&self) -> bool {
        self.status_code.is_some_and(|code| (200..300).contains(&code))
    }
}

/// Result of an operation
pub enum QueryResult {
    /// No result
    Empty,
    Items(Vec<Box<dyn Record>>),
    Item(Box<dyn Record>),
    Status(StatusResult),
    Adapted(Box<dyn ResultAdapter>),
}

impl QueryResult {
    pub fn items<R: Record>(items: impl IntoIterator<Item = R>) -> Self {
        QueryResult::Items(
            items
                .into_iter()
                .map(|item| Box::new(item) as Box<dyn Record>)
                .collect(),
        )
    }

    pub fn item<R: Record>(item: R) -> Self {
        QueryResult::Item(Box::new(item))
    }

    /// `200` status result
    pub fn ok(payload: StatusPayload) -> Self {
        Self::status(200, payload)
    }

    pub fn status(status_code: u16, payload: StatusPayload) -> Self {
        QueryResult::Status(StatusResult {
            status_code: Some(status_code),
            payload,
        })
    }

    pub fn adapted(adapter: impl ResultAdapter + 'static) -> Self {
        QueryResult::Adapted(Box::new(adapter))
    }
}

impl fmt::Debug for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryResult::Empty => f.write_str("Empty"),
            QueryResult::Items(items) => write!(f, "Items({})", items.len()),
            QueryResult::Item(item) => write!(f, "Item({})", item.type_name()),
            QueryResult::Status(status) => write!(f, "Status({:?})", status.status_code),
            QueryResult::Adapted(_) => f.write_str("Adapted"),
        }
    }
}

/// Failure carried by an error status result
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StatusFailure {
    pub status_code: Option<u16>,
    pub message: String,
}

/// Unwrap a result into its items; `Ok(None)` when there are none
pub(crate) fn unwrap_result(result: QueryResult) -> Result<Option<Vec<Box<dyn Record>>>, StatusFailure> {
    let mut current = result;
    loop {
        match current {
            QueryResult::Empty => return Ok(None),
            QueryResult::Items(items) => return Ok(Some(items)),
            QueryResult::Item(item) => return Ok(Some(vec![item])),
            QueryResult::Adapted(adapter) => current = adapter.convert(),
            QueryResult::Status(status) => return unwrap_status(status),
        }
    }
}

fn unwrap_status(status: StatusResult) -> Result<Option<Vec<Box<dyn Record>>>, StatusFailure> {
    if !status.is_success() {
        let payload = status.payload.to_text();
        let message = match status.status_code {
            Some(500) => format!("Internal server error {}", payload),
            Some(code) => format!("{} [{}]", payload, code),
            None => format!("{} []", payload),
        };
        return Err(StatusFailure {
            status_code: status.status_code,
            message,
        });
    }

    match status.payload {
        StatusPayload::Items(items) => Ok(Some(items)),
        StatusPayload::Item(item) => Ok(Some(vec![item])),
        StatusPayload::None | StatusPayload::Text(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Row {
        id: i32,
    }

    crate::impl_record!(Row { "Id" => id });

    impl fmt::Debug for dyn crate::reflect::Record {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.type_name())
        }
    }

    struct Wrapper(QueryResult);

    impl ResultAdapter for Wrapper {
        fn convert(self: Box<Self>) -> QueryResult {
            self.0
        }
    }

    #[test]
    fn test_items_and_single_items() {
        let items = unwrap_result(QueryResult::items(vec![Row { id: 1 }, Row { id: 2 }])).unwrap();
        assert_eq!(items.map(|i| i.len()), Some(2));

        let item = unwrap_result(QueryResult::item(Row { id: 1 })).unwrap();
        assert_eq!(item.map(|i| i.len()), Some(1));

        assert!(unwrap_result(QueryResult::Empty).unwrap().is_none());
    }

    #[test]
    fn test_adapters_unwrap_recursively() {
        let nested = QueryResult::adapted(Wrapper(QueryResult::adapted(Wrapper(QueryResult::ok(
            StatusPayload::Items(vec![Box::new(Row { id: 3 })]),
        )))));
        let items = unwrap_result(nested).unwrap().unwrap();
        assert_eq!(items[0].to_json()["id"], 3);
    }

    #[test]
    fn test_error_status_messages() {
        let failure = unwrap_result(QueryResult::status(500, StatusPayload::Text("boom".into()))).unwrap_err();
        assert_eq!(failure.message, "Internal server error boom");

        let failure = unwrap_result(QueryResult::status(404, StatusPayload::Text("missing".into()))).unwrap_err();
        assert_eq!(failure.message, "missing [404]");
        assert_eq!(failure.status_code, Some(404));

        let failure = unwrap_result(QueryResult::Status(StatusResult {
            status_code: None,
            payload: StatusPayload::None,
        }))
        .unwrap_err();
        assert_eq!(failure.status_code, None);
    }

    #[test]
    fn test_success_without_items() {
        assert!(unwrap_result(QueryResult::ok(StatusPayload::Text("done".into()))).unwrap().is_none());
        let single = unwrap_result(QueryResult::ok(StatusPayload::Item(Box::new(Row { id: 5 })))).unwrap();
        assert_eq!(single.map(|i| i.len()), Some(1));
    }
}
