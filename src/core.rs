pub mod archive;
pub mod client;
pub mod ini;
pub mod linker;
pub mod menu_exporter;
pub mod profile_store;
pub mod registry;
pub mod settings_sync;
pub mod switcher;
