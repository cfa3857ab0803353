//! Relay-style cursor pagination over in-memory result lists

use async_graphql::{InputObject, Object, OutputType, SimpleObject};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::{Result, StoreLocatorError};

/// Page size used when neither `first` nor `last` is given
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Page information
#[derive(SimpleObject, Debug, Clone, PartialEq)]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

/// Edge in a connection
#[derive(Debug, Clone)]
pub struct Edge<T> {
    pub cursor: String,
    pub node: T,
}

#[Object]
impl<T: OutputType> Edge<T> {
    async fn cursor(&self) -> &str {
        &self.cursor
    }

    async fn node(&self) -> &T {
        &self.node
    }
}

/// Connection (paginated result)
#[derive(Debug, Clone)]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
    pub page_info: PageInfo,
    pub total_count: usize,
}

#[Object]
impl<T: OutputType> Connection<T> {
    async fn edges(&self) -> &[Edge<T>] {
        &self.edges
    }

    async fn page_info(&self) -> &PageInfo {
        &self.page_info
    }

    async fn total_count(&self) -> u64 {
        self.total_count as u64
    }
}

impl<T> Connection<T> {
    /// Slice `items` according to `input`.
    ///
    /// Cursors encode the absolute position in `items`, so they stay valid
    /// only while the underlying list keeps its order.
    pub fn paginate(items: Vec<T>, input: &PaginationInput, max_page_size: usize) -> Result<Self> {
        input.validate(max_page_size)?;

        let total = items.len();
        let mut start = match &input.after {
            Some(cursor) => CursorCodec::decode_index(cursor)?.saturating_add(1),
            None => 0,
        };
        let mut end = match &input.before {
            Some(cursor) => CursorCodec::decode_index(cursor)?,
            None => total,
        };
        end = end.min(total);
        start = start.min(end);

        match (input.first, input.last) {
            (Some(first), _) => end = end.min(start + first as usize),
            (None, Some(last)) => start = start.max(end.saturating_sub(last as usize)),
            (None, None) => end = end.min(start + DEFAULT_PAGE_SIZE.min(max_page_size)),
        }

        let edges: Vec<Edge<T>> = items
            .into_iter()
            .enumerate()
            .skip(start)
            .take(end - start)
            .map(|(idx, node)| Edge {
                cursor: CursorCodec::encode_index(idx),
                node,
            })
            .collect();

        let start_cursor = edges.first().map(|e| e.cursor.clone());
        let end_cursor = edges.last().map(|e| e.cursor.clone());

        Ok(Self {
            edges,
            page_info: PageInfo {
                has_next_page: end < total,
                has_previous_page: start > 0,
                start_cursor,
                end_cursor,
            },
            total_count: total,
        })
    }

    /// Convert every node, keeping cursors and page info
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Connection<U> {
        Connection {
            edges: self
                .edges
                .into_iter()
                .map(|e| Edge {
                    cursor: e.cursor,
                    node: f(e.node),
                })
                .collect(),
            page_info: self.page_info,
            total_count: self.total_count,
        }
    }
}

/// Cursor encoding/decoding
pub struct CursorCodec;

impl CursorCodec {
    const PREFIX: &'static str = "store:";

    /// Encode cursor to base64
    pub fn encode(value: &str) -> String {
        BASE64.encode(value.as_bytes())
    }

    /// Decode cursor from base64
    pub fn decode(cursor: &str) -> Result<String> {
        let bytes = BASE64
            .decode(cursor.as_bytes())
            .map_err(|e| StoreLocatorError::InvalidCursor(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| StoreLocatorError::InvalidCursor(e.to_string()))
    }

    pub fn encode_index(index: usize) -> String {
        Self::encode(&format!("{}{}", Self::PREFIX, index))
    }

    pub fn decode_index(cursor: &str) -> Result<usize> {
        let raw = Self::decode(cursor)?;
        raw.strip_prefix(Self::PREFIX)
            .and_then(|idx| idx.parse::<usize>().ok())
            .ok_or_else(|| StoreLocatorError::InvalidCursor(format!("unrecognised cursor {cursor}")))
    }
}

/// Pagination input for GraphQL queries
///
/// Follows the Relay Cursor Connections Specification:
/// https://relay.dev/graphql/connections.htm
#[derive(InputObject, Debug, Clone, Default)]
pub struct PaginationInput {
    /// Number of items to return (forward pagination)
    pub first: Option<i32>,

    /// Cursor to start after (forward pagination)
    pub after: Option<String>,

    /// Number of items to return (backward pagination)
    pub last: Option<i32>,

    /// Cursor to end before (backward pagination)
    pub before: Option<String>,
}

impl PaginationInput {
    pub fn validate(&self, max_page_size: usize) -> Result<()> {
        if self.first.is_some() && self.last.is_some() {
            return Err(StoreLocatorError::Pagination(
                "Cannot specify both 'first' and 'last'".to_string(),
            ));
        }

        for (name, value) in [("first", self.first), ("last", self.last)] {
            if let Some(n) = value {
                if n < 0 {
                    return Err(StoreLocatorError::Pagination(format!(
                        "'{name}' must be non-negative"
                    )));
                }
                if n as usize > max_page_size {
                    return Err(StoreLocatorError::Pagination(format!(
                        "'{name}' cannot exceed {max_page_size}"
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    fn nodes<T: Clone>(conn: &Connection<T>) -> Vec<T> {
        conn.edges.iter().map(|e| e.node.clone()).collect()
    }

    #[test]
    fn test_cursor_codec() {
        let encoded = CursorCodec::encode_index(42);
        assert_eq!(CursorCodec::decode_index(&encoded).unwrap(), 42);
        assert!(CursorCodec::decode_index("!!!").is_err());
        assert!(CursorCodec::decode_index(&CursorCodec::encode("other:1")).is_err());
    }

    #[test]
    fn test_default_page() {
        let conn = Connection::paginate(numbers(30), &PaginationInput::default(), 100).unwrap();
        assert_eq!(conn.edges.len(), DEFAULT_PAGE_SIZE);
        assert!(conn.page_info.has_next_page);
        assert!(!conn.page_info.has_previous_page);
        assert_eq!(conn.total_count, 30);
    }

    #[test]
    fn test_default_page_respects_smaller_max() {
        let conn = Connection::paginate(numbers(50), &PaginationInput::default(), 5).unwrap();
        assert_eq!(nodes(&conn), vec![0, 1, 2, 3, 4]);
        assert!(conn.page_info.has_next_page);

        let next = PaginationInput {
            after: conn.page_info.end_cursor.clone(),
            ..Default::default()
        };
        let page2 = Connection::paginate(numbers(50), &next, 5).unwrap();
        assert_eq!(nodes(&page2), vec![5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_forward_pages() {
        let first = PaginationInput {
            first: Some(2),
            ..Default::default()
        };
        let page1 = Connection::paginate(numbers(5), &first, 100).unwrap();
        assert_eq!(nodes(&page1), vec![0, 1]);

        let next = PaginationInput {
            first: Some(2),
            after: page1.page_info.end_cursor.clone(),
            ..Default::default()
        };
        let page2 = Connection::paginate(numbers(5), &next, 100).unwrap();
        assert_eq!(nodes(&page2), vec![2, 3]);
        assert!(page2.page_info.has_next_page);
        assert!(page2.page_info.has_previous_page);
    }

    #[test]
    fn test_backward_page() {
        let input = PaginationInput {
            last: Some(2),
            before: Some(CursorCodec::encode_index(4)),
            ..Default::default()
        };
        let page = Connection::paginate(numbers(5), &input, 100).unwrap();
        assert_eq!(nodes(&page), vec![2, 3]);
        assert!(page.page_info.has_next_page);
    }

    #[test]
    fn test_cursor_past_end_is_empty() {
        let input = PaginationInput {
            after: Some(CursorCodec::encode_index(10)),
            ..Default::default()
        };
        let page = Connection::paginate(numbers(3), &input, 100).unwrap();
        assert!(page.edges.is_empty());
        assert!(page.page_info.start_cursor.is_none());
    }

    #[test]
    fn test_validation() {
        let both = PaginationInput {
            first: Some(1),
            last: Some(1),
            ..Default::default()
        };
        assert!(both.validate(100).is_err());

        let negative = PaginationInput {
            first: Some(-1),
            ..Default::default()
        };
        assert!(negative.validate(100).is_err());

        let too_many = PaginationInput {
            last: Some(11),
            ..Default::default()
        };
        assert!(matches!(
            too_many.validate(10),
            Err(StoreLocatorError::Pagination(_))
        ));
    }

    #[test]
    fn test_map_keeps_cursors() {
        let conn = Connection::paginate(numbers(3), &PaginationInput::default(), 100).unwrap();
        let cursors: Vec<String> = conn.edges.iter().map(|e| e.cursor.clone()).collect();
        let mapped = conn.map(|n| n.to_string());
        assert_eq!(mapped.edges[2].node, "2");
        assert_eq!(mapped.edges[2].cursor, cursors[2]);
    }
}
