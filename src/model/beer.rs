//! Beer records as exchanged with the catalog API.

// self
use crate::_prelude::*;

/// Beer styles understood by the catalog. Serialized as the upper-case enum name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BeerStyle {
	/// Lager.
	Lager,
	/// Pilsner.
	Pilsner,
	/// Stout.
	Stout,
	/// Gose.
	Gose,
	/// Pale ale.
	PaleAle,
	/// Wheat beer.
	Wheat,
	/// India pale ale.
	Ipa,
	/// Ale.
	Ale,
	/// Porter.
	Porter,
	/// Saison.
	Saison,
}
impl BeerStyle {
	/// Every style, in declaration order.
	pub const ALL: [BeerStyle; 10] = [
		BeerStyle::Lager,
		BeerStyle::Pilsner,
		BeerStyle::Stout,
		BeerStyle::Gose,
		BeerStyle::PaleAle,
		BeerStyle::Wheat,
		BeerStyle::Ipa,
		BeerStyle::Ale,
		BeerStyle::Porter,
		BeerStyle::Saison,
	];

	/// Returns the wire name used in JSON bodies and query strings.
	pub const fn as_str(self) -> &'static str {
		match self {
			BeerStyle::Lager => "LAGER",
			BeerStyle::Pilsner => "PILSNER",
			BeerStyle::Stout => "STOUT",
			BeerStyle::Gose => "GOSE",
			BeerStyle::PaleAle => "PALE_ALE",
			BeerStyle::Wheat => "WHEAT",
			BeerStyle::Ipa => "IPA",
			BeerStyle::Ale => "ALE",
			BeerStyle::Porter => "PORTER",
			BeerStyle::Saison => "SAISON",
		}
	}
}
impl Display for BeerStyle {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for BeerStyle {
	type Err = UnknownBeerStyle;

	/// Case-insensitive lookup by wire name.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|style| style.as_str().eq_ignore_ascii_case(s))
			.ok_or_else(|| UnknownBeerStyle(s.to_owned()))
	}
}

/// Error returned when parsing an unrecognized style name.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Unknown beer style `{0}`.")]
pub struct UnknownBeerStyle(pub String);

/// A catalog entry.
///
/// `id`, `version`, and the timestamps are assigned by the server; they are omitted from
/// request bodies when unset and never interpreted by the client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeerRecord {
	/// Server-assigned identifier.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<Uuid>,
	/// Optimistic-locking version.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub version: Option<i32>,
	/// Display name.
	pub beer_name: String,
	/// Style.
	pub beer_style: BeerStyle,
	/// Universal product code.
	pub upc: String,
	/// Units in stock; omitted on create when unknown.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub quantity_on_hand: Option<i32>,
	/// Unit price.
	pub price: Decimal,
	/// Creation timestamp as emitted by the server.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub created_date: Option<serde_json::Value>,
	/// Last update timestamp as emitted by the server.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub update_date: Option<serde_json::Value>,
}
impl BeerRecord {
	/// Returns a builder for a new, unsaved record.
	pub fn builder() -> BeerRecordBuilder {
		BeerRecordBuilder::default()
	}

	/// Returns a copy carrying `id`.
	pub fn with_id(mut self, id: Uuid) -> Self {
		self.id = Some(id);

		self
	}

	/// Returns a copy named `name`.
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.beer_name = name.into();

		self
	}

	/// Body sent on create: the identifier is never transmitted.
	pub(crate) fn for_create(&self) -> Self {
		Self { id: None, ..self.clone() }
	}
}

/// Errors produced by [`BeerRecordBuilder`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum BeerRecordBuilderError {
	/// No name.
	#[error("Beer name is required.")]
	MissingName,
	/// No style.
	#[error("Beer style is required.")]
	MissingStyle,
	/// No price.
	#[error("Price is required.")]
	MissingPrice,
	/// No UPC.
	#[error("UPC is required.")]
	MissingUpc,
}

/// Field-by-field builder for [`BeerRecord`].
#[derive(Clone, Debug, Default)]
pub struct BeerRecordBuilder {
	id: Option<Uuid>,
	beer_name: Option<String>,
	beer_style: Option<BeerStyle>,
	upc: Option<String>,
	quantity_on_hand: Option<i32>,
	price: Option<Decimal>,
}
impl BeerRecordBuilder {
	/// Sets the identifier (only meaningful for records that already exist).
	pub fn id(mut self, id: Uuid) -> Self {
		self.id = Some(id);

		self
	}

	/// Sets the name.
	pub fn beer_name(mut self, name: impl Into<String>) -> Self {
		self.beer_name = Some(name.into());

		self
	}

	/// Sets the style.
	pub fn beer_style(mut self, style: BeerStyle) -> Self {
		self.beer_style = Some(style);

		self
	}

	/// Sets the UPC.
	pub fn upc(mut self, upc: impl Into<String>) -> Self {
		self.upc = Some(upc.into());

		self
	}

	/// Sets the stock count.
	pub fn quantity_on_hand(mut self, quantity: i32) -> Self {
		self.quantity_on_hand = Some(quantity);

		self
	}

	/// Sets the price.
	pub fn price(mut self, price: Decimal) -> Self {
		self.price = Some(price);

		self
	}

	/// Consumes the builder and produces a [`BeerRecord`].
	pub fn build(self) -> Result<BeerRecord, BeerRecordBuilderError> {
		let beer_name = self.beer_name.ok_or(BeerRecordBuilderError::MissingName)?;
		let beer_style = self.beer_style.ok_or(BeerRecordBuilderError::MissingStyle)?;
		let price = self.price.ok_or(BeerRecordBuilderError::MissingPrice)?;
		let upc = self.upc.ok_or(BeerRecordBuilderError::MissingUpc)?;

		Ok(BeerRecord {
			id: self.id,
			version: None,
			beer_name,
			beer_style,
			upc,
			quantity_on_hand: self.quantity_on_hand,
			price,
			created_date: None,
			update_date: None,
		})
	}
}
