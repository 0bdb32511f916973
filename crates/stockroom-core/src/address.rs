//! Resource addresses and the router that classifies them.
//!
//! An address names either the whole item collection
//! (`content://<authority>/items`) or a single row
//! (`content://<authority>/items/<id>`). The [`Router`] is an immutable table
//! built once for one authority; callers own it rather than consulting shared
//! global state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RouteError;
use crate::types::ItemId;

/// Scheme prefix of every address.
pub const SCHEME: &str = "content://";

/// Path segment naming the item collection.
pub const ITEMS_PATH: &str = "items";

/// A parsed resource address: an authority plus path segments.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceAddress {
    authority: String,
    segments: Vec<String>,
}

impl ResourceAddress {
    /// Parse an address. The `content://` scheme is optional on input.
    ///
    /// Empty path segments are dropped, so `items/` and `items` are the same
    /// address.
    pub fn parse(s: &str) -> Result<Self, RouteError> {
        let rest = s.strip_prefix(SCHEME).unwrap_or(s);
        let mut parts = rest.split('/');
        let authority = parts.next().unwrap_or_default();
        if authority.is_empty() || authority.contains(char::is_whitespace) {
            return Err(RouteError::Malformed(s.to_owned()));
        }
        let segments = parts
            .filter(|p| !p.is_empty())
            .map(str::to_owned)
            .collect();
        Ok(Self {
            authority: authority.to_owned(),
            segments,
        })
    }

    /// The collection address for an authority.
    pub fn collection(authority: &str) -> Self {
        Self {
            authority: authority.to_owned(),
            segments: vec![ITEMS_PATH.to_owned()],
        }
    }

    /// The single-item address for an authority and row id.
    pub fn item(authority: &str, id: ItemId) -> Self {
        Self::collection(authority).with_appended_id(id)
    }

    /// Append a row id as a new trailing segment.
    pub fn with_appended_id(&self, id: ItemId) -> Self {
        let mut segments = self.segments.clone();
        segments.push(id.to_string());
        Self {
            authority: self.authority.clone(),
            segments,
        }
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The address one segment up, if any.
    pub fn parent(&self) -> Option<Self> {
        let (_, init) = self.segments.split_last()?;
        Some(Self {
            authority: self.authority.clone(),
            segments: init.to_vec(),
        })
    }

    /// True when `other` lies strictly below this address.
    pub fn is_ancestor_of(&self, other: &ResourceAddress) -> bool {
        self.authority == other.authority
            && other.segments.len() > self.segments.len()
            && other.segments.starts_with(&self.segments)
    }
}

impl fmt::Display for ResourceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", SCHEME, self.authority)?;
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ResourceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceAddress({})", self)
    }
}

impl FromStr for ResourceAddress {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ResourceAddress {
    type Error = RouteError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<ResourceAddress> for String {
    fn from(address: ResourceAddress) -> Self {
        address.to_string()
    }
}

/// What an address refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Every row of the items table.
    Collection,
    /// One row, by id.
    Item(ItemId),
}

/// MIME-style content type of an address kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Dir,
    Item,
}

impl ContentType {
    pub fn mime(self, authority: &str) -> String {
        let kind = match self {
            ContentType::Dir => "dir",
            ContentType::Item => "item",
        };
        format!("vnd.stockroom.{}/{}/{}", kind, authority, ITEMS_PATH)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment {
    Literal(&'static str),
    Number,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Collection,
    Item,
}

/// Immutable address-pattern table for one authority.
#[derive(Debug, Clone)]
pub struct Router {
    authority: String,
    table: Vec<(Vec<Segment>, Kind)>,
}

impl Router {
    /// Build the table for `authority`.
    pub fn new(authority: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
            table: vec![
                (vec![Segment::Literal(ITEMS_PATH)], Kind::Collection),
                (
                    vec![Segment::Literal(ITEMS_PATH), Segment::Number],
                    Kind::Item,
                ),
            ],
        }
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// The collection address served by this router.
    pub fn collection(&self) -> ResourceAddress {
        ResourceAddress::collection(&self.authority)
    }

    /// The single-item address for `id`.
    pub fn item(&self, id: ItemId) -> ResourceAddress {
        ResourceAddress::item(&self.authority, id)
    }

    /// Classify an address.
    pub fn route(&self, address: &ResourceAddress) -> Result<Route, RouteError> {
        let unknown = || RouteError::UnknownResource(address.to_string());
        if address.authority() != self.authority {
            return Err(unknown());
        }

        let segments = address.segments();
        for (pattern, kind) in &self.table {
            if pattern.len() != segments.len() {
                continue;
            }
            let mut number = None;
            let matched = pattern.iter().zip(segments).all(|(p, s)| match p {
                Segment::Literal(lit) => *lit == s.as_str(),
                Segment::Number => match parse_id(s) {
                    Some(id) => {
                        number = Some(id);
                        true
                    }
                    None => false,
                },
            });
            if !matched {
                continue;
            }
            return match (kind, number) {
                (Kind::Collection, _) => Ok(Route::Collection),
                (Kind::Item, Some(id)) => Ok(Route::Item(id)),
                (Kind::Item, None) => Err(unknown()),
            };
        }

        Err(unknown())
    }

    /// Parse then classify.
    pub fn route_str(&self, s: &str) -> Result<(ResourceAddress, Route), RouteError> {
        let address = ResourceAddress::parse(s)?;
        let route = self.route(&address)?;
        Ok((address, route))
    }

    pub fn content_type(&self, address: &ResourceAddress) -> Result<ContentType, RouteError> {
        Ok(match self.route(address)? {
            Route::Collection => ContentType::Dir,
            Route::Item(_) => ContentType::Item,
        })
    }
}

/// Non-negative decimal integer, digits only.
fn parse_id(s: &str) -> Option<ItemId> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<i64>().ok().map(ItemId::new)
}
