// Library root
// -----------
// A terminal client for the cupcake catalog server. The binary
// (`main.rs`) wires these modules together.
//
// Module responsibilities:
// - `model`: cupcake records and the create/update/search forms.
// - `api`: the `CatalogApi` seam and its HTTP implementation.
// - `view`: the `ViewPort` list container and rendered entries.
// - `controller`: turns user actions into catalog calls and view updates.
// - `config`, `logging`, `error`: ambient plumbing.
// - `ui`: the interactive terminal front end.
//
// The controller only sees the `CatalogApi` and `ViewPort` traits, so it
// can be driven in tests without a server or a terminal.
pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod model;
pub mod ui;
pub mod view;
