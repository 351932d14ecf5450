//! # Store Walkthrough
//!
//! Browse the catalogue, fill a cart and hand the cart to PayStation.

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use xsolla_core::classify::ITEMS_LIST_ERRORS;
use xsolla_core::{
    ErrorTables, PayStationApi, StoreApi, StoreItem, StoreItems, Token, TokenRequest,
    XsollaResult, XsollaSettings,
};
use xsolla_http::{ClientConfig, WebRequest, WebRequestHelper};

/// What the walkthrough did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowReport {
    pub item_count: usize,
    pub group_count: usize,
    pub cart_id: Option<String>,
    pub cart_total: Option<String>,
    pub purchase_url: Option<String>,
    pub balances: Vec<(String, f64)>,
}

/// First item with a real-money price
fn first_priced_item(items: &StoreItems) -> Option<&StoreItem> {
    items
        .items
        .iter()
        .find(|item| !item.is_free && item.default_price().is_some())
}

/// Run the full store flow for a signed-in user
pub async fn run_store_flow(
    store: &dyn StoreApi,
    settings: &XsollaSettings,
    token: &Token,
) -> anyhow::Result<FlowReport> {
    let locale = settings.locale.as_deref();

    let items = store.get_list_of_items(locale).await?;
    let groups = store.get_item_groups(locale).await?;
    info!("Catalogue: {} items in {} groups", items.len(), groups.groups.len());

    for group in items.group_names() {
        info!("  [{}] {} items", group, items.in_group(&group).count());
    }

    let mut report = FlowReport {
        item_count: items.len(),
        group_count: groups.groups.len(),
        ..Default::default()
    };

    match first_priced_item(&items) {
        Some(item) => {
            let cart = store.create_new_cart(token).await?;
            info!("Cart {} created", cart.id);

            store.add_item_to_cart(token, &cart, &item.sku, 1).await?;
            info!("Added {} to cart", item.name);

            let contents = store.get_cart_items(token, &cart).await?;
            if let Some(price) = &contents.price {
                let total = format!("{:.2} {}", price.amount, price.currency);
                info!("Cart total: {}", total);
                report.cart_total = Some(total);
            }

            let purchase = store.buy_cart(token, &cart).await?;
            let url = settings.paystation_url(&purchase.token);
            info!("Open PayStation to pay: {}", url);

            report.cart_id = Some(cart.id);
            report.purchase_url = Some(url);
        }
        None => warn!("No priced items in the catalogue, skipping cart"),
    }

    let balance = store.get_virtual_currency_balance(token).await?;
    for currency in &balance.items {
        info!("Balance: {} {}", currency.amount, currency.name);
    }
    report.balances = balance
        .items
        .into_iter()
        .map(|b| (b.name, b.amount))
        .collect();

    Ok(report)
}

/// Request a PayStation token through the merchant API and return the payment page.
///
/// Needs the merchant id and api key; without them the call fails before
/// anything is sent.
pub async fn issue_paystation_token(
    paystation: &dyn PayStationApi,
    request: &TokenRequest,
) -> anyhow::Result<String> {
    let token = paystation.request_token(request).await?;
    let url = paystation.purchase_url(&token);
    info!("PayStation test purchase: {}", url);
    Ok(url)
}

/// List the catalogue through the callback channel.
///
/// Each callback logs its outcome and forwards it to `outcome`: the number
/// of items on success, the error otherwise.
pub fn spawn_catalogue_listing(
    helper: &WebRequestHelper,
    config: &ClientConfig,
    outcome: UnboundedSender<XsollaResult<usize>>,
) -> anyhow::Result<JoinHandle<()>> {
    let url = config.store_url_segments(
        "v1/project",
        &[
            config.settings.store_project_id.as_str(),
            "items",
            "virtual_items",
        ],
    )?;

    let mut request = WebRequest::get(url).errors(ErrorTables::store(Some(&ITEMS_LIST_ERRORS)));
    if let Some(locale) = &config.settings.locale {
        request = request.query("locale", locale.as_str());
    }

    let on_error = outcome.clone();
    let handle = helper.spawn(
        request,
        move |items: StoreItems| {
            for item in &items.items {
                let price = item
                    .default_price()
                    .map(|p| p.display())
                    .unwrap_or_else(|| "free".to_string());
                info!("  {} ({}): {}", item.name, item.sku, price);
            }
            let _ = outcome.send(Ok(items.len()));
        },
        move |error| {
            warn!("Catalogue listing failed: {}", error);
            let _ = on_error.send(Err(error));
        },
    );

    Ok(handle)
}
