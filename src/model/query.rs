//! Optional filters for listing beers.

// self
use crate::{_prelude::*, model::BeerStyle};

/// Filters and paging for `GET /api/v1/beer`.
///
/// Unset fields are left out of the query string entirely so the server applies its own
/// defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBeersQuery {
	/// Name filter.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub beer_name: Option<String>,
	/// Style filter.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub beer_style: Option<BeerStyle>,
	/// Whether the server should include stock counts.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub show_inventory: Option<bool>,
	/// Page index requested from the server.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub page_number: Option<u32>,
	/// Page size requested from the server.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub page_size: Option<u32>,
}
impl ListBeersQuery {
	/// Creates an empty query.
	pub fn new() -> Self {
		Self::default()
	}

	/// Filters by name.
	pub fn beer_name(mut self, name: impl Into<String>) -> Self {
		self.beer_name = Some(name.into());

		self
	}

	/// Filters by style.
	pub fn beer_style(mut self, style: BeerStyle) -> Self {
		self.beer_style = Some(style);

		self
	}

	/// Asks the server to include or hide stock counts.
	pub fn show_inventory(mut self, show: bool) -> Self {
		self.show_inventory = Some(show);

		self
	}

	/// Requests a specific page.
	pub fn page_number(mut self, number: u32) -> Self {
		self.page_number = Some(number);

		self
	}

	/// Requests a specific page size.
	pub fn page_size(mut self, size: u32) -> Self {
		self.page_size = Some(size);

		self
	}

	/// Returns `true` when no parameter is set.
	pub fn is_empty(&self) -> bool {
		self.query_pairs().is_empty()
	}

	/// Set parameters as `(name, value)` pairs, in a stable order.
	pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
		let mut pairs = Vec::new();

		if let Some(name) = &self.beer_name {
			pairs.push(("beerName", name.clone()));
		}
		if let Some(style) = self.beer_style {
			pairs.push(("beerStyle", style.as_str().to_owned()));
		}
		if let Some(show) = self.show_inventory {
			pairs.push(("showInventory", show.to_string()));
		}
		if let Some(number) = self.page_number {
			pairs.push(("pageNumber", number.to_string()));
		}
		if let Some(size) = self.page_size {
			pairs.push(("pageSize", size.to_string()));
		}

		pairs
	}

	/// Appends the set parameters to `url`, leaving it untouched when none are set.
	pub fn apply_to(&self, url: &mut Url) {
		let pairs = self.query_pairs();

		if pairs.is_empty() {
			return;
		}

		let mut serializer = url.query_pairs_mut();

		for (name, value) in &pairs {
			serializer.append_pair(name, value);
		}
	}
}
