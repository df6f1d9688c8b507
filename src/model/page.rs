//! Paginated response envelope.
//!
//! Servers disagree on where pagination metadata lives. Decoding accepts the classic
//! `{content, number, size, totalElements}` layout, the nested `page` object emitted by newer
//! Spring Data versions, and the `pageable` object, in that order of preference. Missing
//! metadata falls back to a single page holding exactly `content`, with a page size of at
//! least 1.

// std
use std::slice::Iter;
// self
use crate::_prelude::*;

/// One page of a larger result set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPage<T>")]
pub struct Page<T> {
	/// Items on this page, in server order.
	pub content: Vec<T>,
	/// Zero-based page index.
	#[serde(rename = "number")]
	pub page_number: u32,
	/// Requested page size. Zero only when the server itself reports an unsized page.
	#[serde(rename = "size")]
	pub page_size: u32,
	/// Total items across all pages.
	#[serde(rename = "totalElements")]
	pub total_elements: u64,
}
impl<T> Page<T> {
	/// Builds a page after checking the metadata against `content`.
	pub fn new(
		content: Vec<T>,
		page_number: u32,
		page_size: u32,
		total_elements: u64,
	) -> Result<Self, PageError> {
		let content_len = content.len();

		if page_size > 0 && content_len > page_size as usize {
			return Err(PageError::OversizedContent { content_len, page_size });
		}
		if (content_len as u64) > total_elements {
			return Err(PageError::TotalBelowContent { content_len, total_elements });
		}

		Ok(Self { content, page_number, page_size, total_elements })
	}

	/// Number of items on this page.
	pub fn len(&self) -> usize {
		self.content.len()
	}

	/// Returns `true` if this page holds no items.
	pub fn is_empty(&self) -> bool {
		self.content.is_empty()
	}

	/// Iterator over the items on this page.
	pub fn iter(&self) -> Iter<'_, T> {
		self.content.iter()
	}

	/// Total number of pages implied by the metadata.
	pub fn total_pages(&self) -> u64 {
		if self.page_size == 0 {
			return u64::from(self.total_elements > 0);
		}

		self.total_elements.div_ceil(u64::from(self.page_size))
	}

	/// Returns `true` for the first page.
	pub fn is_first(&self) -> bool {
		self.page_number == 0
	}

	/// Returns `true` when no page follows this one.
	pub fn is_last(&self) -> bool {
		u64::from(self.page_number) + 1 >= self.total_pages()
	}

	/// Consumes the page and returns its items.
	pub fn into_content(self) -> Vec<T> {
		self.content
	}
}
impl<'a, T> IntoIterator for &'a Page<T> {
	type IntoIter = Iter<'a, T>;
	type Item = &'a T;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}
impl<T> IntoIterator for Page<T> {
	type IntoIter = std::vec::IntoIter<T>;
	type Item = T;

	fn into_iter(self) -> Self::IntoIter {
		self.content.into_iter()
	}
}

/// Inconsistent pagination metadata.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum PageError {
	/// More items than the page size allows.
	#[error("Page holds {content_len} items but its size is {page_size}.")]
	OversizedContent {
		/// Items on the page.
		content_len: usize,
		/// Declared page size.
		page_size: u32,
	},
	/// Total smaller than the page itself.
	#[error("Page holds {content_len} items but reports only {total_elements} in total.")]
	TotalBelowContent {
		/// Items on the page.
		content_len: usize,
		/// Declared total.
		total_elements: u64,
	},
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPage<T> {
	content: Vec<T>,
	number: Option<u32>,
	size: Option<u32>,
	total_elements: Option<u64>,
	page: Option<NestedPage>,
	pageable: Option<Pageable>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NestedPage {
	number: Option<u32>,
	size: Option<u32>,
	total_elements: Option<u64>,
}

// Spring emits the string "INSTANCE" for unpaged requests, so every field stays optional and
// non-object values are tolerated by the untagged fallback.
#[derive(Deserialize)]
#[serde(untagged)]
enum Pageable {
	Paged {
		#[serde(rename = "pageNumber")]
		page_number: Option<u32>,
		#[serde(rename = "pageSize")]
		page_size: Option<u32>,
	},
	Other(serde_json::Value),
}
impl Pageable {
	fn number(&self) -> Option<u32> {
		match self {
			Pageable::Paged { page_number, .. } => *page_number,
			Pageable::Other(_) => None,
		}
	}

	fn size(&self) -> Option<u32> {
		match self {
			Pageable::Paged { page_size, .. } => *page_size,
			Pageable::Other(_) => None,
		}
	}
}

impl<T> TryFrom<RawPage<T>> for Page<T> {
	type Error = PageError;

	fn try_from(raw: RawPage<T>) -> Result<Self, Self::Error> {
		let nested = raw.page.as_ref();
		let pageable = raw.pageable.as_ref();
		let content_len = raw.content.len();
		let page_number = raw
			.number
			.or_else(|| nested.and_then(|page| page.number))
			.or_else(|| pageable.and_then(Pageable::number))
			.unwrap_or(0);
		let page_size = raw
			.size
			.or_else(|| nested.and_then(|page| page.size))
			.or_else(|| pageable.and_then(Pageable::size))
			.unwrap_or_else(|| u32::try_from(content_len).unwrap_or(u32::MAX).max(1));
		let total_elements = raw
			.total_elements
			.or_else(|| nested.and_then(|page| page.total_elements))
			.unwrap_or(content_len as u64);

		Page::new(raw.content, page_number, page_size, total_elements)
	}
}
