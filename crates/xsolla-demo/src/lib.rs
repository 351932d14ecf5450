//! # xsolla-demo
//!
//! Console walkthrough of the Xsolla Store flow.
//!
//! | Step | Call |
//! |------|------|
//! | 1 | `sign_in` |
//! | 2 | `get_list_of_items`, `get_item_groups` |
//! | 3 | `create_new_cart`, `add_item_to_cart` |
//! | 4 | `get_cart_items` |
//! | 5 | `buy_cart`, PayStation URL |
//! | 6 | `get_virtual_currency_balance` |
//! | 7 | `request_token` (merchant api key only) |

pub mod flow;
pub mod state;

pub use flow::{issue_paystation_token, run_store_flow, spawn_catalogue_listing, FlowReport};
pub use state::{Credentials, DemoState};
