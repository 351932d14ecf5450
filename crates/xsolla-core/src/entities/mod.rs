//! Data-transfer records exchanged with the Xsolla APIs.

pub mod login;
pub mod paystation;
pub mod store;

pub use login::{LoginUrlResponse, RegistrationRequest, ResetPasswordRequest, SignInRequest, Token};
pub use paystation::TokenRequest;
pub use store::{
    Cart, CartItem, CartItems, CartPrice, Group, Groups, ItemGroup, ItemPrice, PurchaseData,
    Quantity, StoreItem, StoreItems, VirtualCurrenciesBalance, VirtualCurrencyBalance,
    VirtualPrice, UNGROUPED_GROUP_NAME, VIRTUAL_CURRENCY_TYPE,
};
