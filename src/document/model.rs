//! Document and product value types.
//!
//! Field names on the wire follow the upstream API exactly, including its
//! mix of `snake_case` and `camelCase` (`importRequest`, `participantInn`).

use serde::{Deserialize, Serialize};

/// Nested description block. Always mirrors the document's participant.
///
/// Only a [`Document`] can produce one, so the two INNs cannot drift apart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Description {
    #[serde(rename = "participantInn")]
    participant_inn: String,
}

impl Description {
    /// INN of the participant submitting the document.
    pub fn participant_inn(&self) -> &str {
        &self.participant_inn
    }
}

/// A product line inside a [`Document`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Kind of conformity document, e.g. `CONFORMITY_CERTIFICATE`.
    pub certificate_document: String,
    /// Issue date of the conformity document.
    pub certificate_document_date: String,
    /// Number of the conformity document.
    pub certificate_document_number: String,
    /// INN of the product owner.
    pub owner_inn: String,
    /// INN of the producer.
    pub producer_inn: String,
    /// Production date, `YYYY-MM-DD`.
    pub production_date: String,
    /// Commodity code (TN VED).
    pub tnved_code: String,
    /// Unit identification code.
    pub uit_code: String,
    /// Transport package identification code.
    pub uitu_code: String,
}

/// The "create document" payload.
///
/// Fields are read-only once built. Use [`Document::new`] for the identity
/// fields alone or [`Document::builder`] for everything else; both derive
/// `description.participantInn` from `participant_inn`.
///
/// ```rust
/// use window_gate::{Document, Product};
///
/// let document = Document::builder("doc-1", "LP_INTRODUCE_GOODS")
///     .participant_inn("7700000000")
///     .product(Product {
///         uit_code: "010463003407001221SxMGorvNuq6Wk91fgr92sHWN".into(),
///         ..Product::default()
///     })
///     .build();
///
/// let json = serde_json::to_value(&document).unwrap();
/// assert_eq!(json["description"]["participantInn"], "7700000000");
/// assert_eq!(json["importRequest"], false);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    description: Description,
    doc_id: String,
    doc_status: String,
    doc_type: String,
    #[serde(rename = "importRequest")]
    import_request: bool,
    owner_inn: String,
    participant_inn: String,
    producer_inn: String,
    production_date: String,
    production_type: String,
    products: Vec<Product>,
    reg_date: String,
    reg_number: String,
}

impl Document {
    /// Creates a document with its identity fields and participant set.
    ///
    /// ```rust
    /// use window_gate::Document;
    ///
    /// let document = Document::new("doc-1", "LP_INTRODUCE_GOODS", "7700000000");
    /// assert_eq!(document.description().participant_inn(), "7700000000");
    /// ```
    pub fn new(
        doc_id: impl Into<String>,
        doc_type: impl Into<String>,
        participant_inn: impl Into<String>,
    ) -> Self {
        Self::builder(doc_id, doc_type)
            .participant_inn(participant_inn)
            .build()
    }

    /// Starts a document with its identity fields set.
    pub fn builder(doc_id: impl Into<String>, doc_type: impl Into<String>) -> DocumentBuilder {
        DocumentBuilder {
            document: Document {
                doc_id: doc_id.into(),
                doc_type: doc_type.into(),
                ..Document::default()
            },
        }
    }

    /// Description block derived from [`participant_inn`](Self::participant_inn).
    pub fn description(&self) -> &Description {
        &self.description
    }

    /// Document identifier.
    pub fn doc_id(&self) -> &str {
        &self.doc_id
    }

    /// Document status, e.g. `DRAFT`.
    pub fn doc_status(&self) -> &str {
        &self.doc_status
    }

    /// Document type, e.g. `LP_INTRODUCE_GOODS`.
    pub fn doc_type(&self) -> &str {
        &self.doc_type
    }

    /// Whether the goods are imported.
    pub fn import_request(&self) -> bool {
        self.import_request
    }

    /// INN of the goods owner.
    pub fn owner_inn(&self) -> &str {
        &self.owner_inn
    }

    /// INN of the submitting participant.
    pub fn participant_inn(&self) -> &str {
        &self.participant_inn
    }

    /// INN of the producer.
    pub fn producer_inn(&self) -> &str {
        &self.producer_inn
    }

    /// Production date, `YYYY-MM-DD`.
    pub fn production_date(&self) -> &str {
        &self.production_date
    }

    /// Production type, e.g. `OWN_PRODUCTION`.
    pub fn production_type(&self) -> &str {
        &self.production_type
    }

    /// Product lines.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Registration date.
    pub fn reg_date(&self) -> &str {
        &self.reg_date
    }

    /// Registration number.
    pub fn reg_number(&self) -> &str {
        &self.reg_number
    }
}

/// Fluent builder for [`Document`].
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    document: Document,
}

impl DocumentBuilder {
    /// Sets the document status.
    pub fn doc_status(mut self, status: impl Into<String>) -> Self {
        self.document.doc_status = status.into();
        self
    }

    /// Marks the goods as imported.
    pub fn import_request(mut self, import_request: bool) -> Self {
        self.document.import_request = import_request;
        self
    }

    /// Sets the goods owner.
    pub fn owner_inn(mut self, inn: impl Into<String>) -> Self {
        self.document.owner_inn = inn.into();
        self
    }

    /// Sets the participant and the matching `description.participantInn`.
    pub fn participant_inn(mut self, inn: impl Into<String>) -> Self {
        let inn = inn.into();
        self.document.description.participant_inn = inn.clone();
        self.document.participant_inn = inn;
        self
    }

    /// Sets the producer.
    pub fn producer_inn(mut self, inn: impl Into<String>) -> Self {
        self.document.producer_inn = inn.into();
        self
    }

    /// Sets the production date.
    pub fn production_date(mut self, date: impl Into<String>) -> Self {
        self.document.production_date = date.into();
        self
    }

    /// Sets the production type.
    pub fn production_type(mut self, production_type: impl Into<String>) -> Self {
        self.document.production_type = production_type.into();
        self
    }

    /// Appends one product line.
    pub fn product(mut self, product: Product) -> Self {
        self.document.products.push(product);
        self
    }

    /// Appends several product lines.
    pub fn products(mut self, products: impl IntoIterator<Item = Product>) -> Self {
        self.document.products.extend(products);
        self
    }

    /// Sets the registration date and number.
    pub fn registration(mut self, reg_date: impl Into<String>, reg_number: impl Into<String>) -> Self {
        self.document.reg_date = reg_date.into();
        self.document.reg_number = reg_number.into();
        self
    }

    /// Finishes the document.
    pub fn build(self) -> Document {
        self.document
    }
}
