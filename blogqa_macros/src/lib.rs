mod model;

use proc_macro::TokenStream;

/// Derive macro for `blogqa::Model`.
///
/// ```ignore
/// #[derive(Clone, Serialize, Deserialize, Model)]
/// #[model(collection = "questions")]
/// pub struct Question {
///     pub id: String,
///     pub title: String,
/// }
/// ```
///
/// - `#[model(collection = "...")]` sets the collection name.
///   If omitted, defaults to snake_case struct name + "s".
/// - `#[model(id)]` marks the field used as the unique identifier.
///   If omitted, defaults to a field named `id`.
#[proc_macro_derive(Model, attributes(model))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    model::derive_model(input)
}
