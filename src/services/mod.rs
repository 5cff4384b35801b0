pub mod conference_api;
