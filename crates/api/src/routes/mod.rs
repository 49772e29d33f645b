pub mod auth;
pub mod bank_movements;
pub mod health;
pub mod invoices;
pub mod payment_methods;
pub mod preferences;
pub mod preparation_zones;
pub mod price_lists;
pub mod product_families;
pub mod sales_agents;
pub mod shifts;
pub mod stock_movements;
pub mod suppliers;
pub mod users;
pub mod work_orders;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Every route except `/auth/login` and `/auth/refresh` needs a Bearer
/// token; business routes also need the `x-tenant-id` header.
///
/// ```text
/// /auth/login                                   login (public)
/// /auth/refresh                                 refresh (public)
/// /auth/logout                                  logout
///
/// /users                                        list, create (admin only)
/// /users/{id}                                   get, update, deactivate
///
/// /preparation-zones                            list, create
/// /preparation-zones/{id}                       get, update, delete
///
/// /product-families                             list, create
/// /product-families/{id}                        get, update, delete
///
/// /sales-agents                                 list, create
/// /sales-agents/{id}                            get, update, delete
/// /sales-agents/{id}/commissions                commission report
///
/// /bank-movements                               list, create
/// /bank-movements/summary                       income/expense summary
/// /bank-movements/{id}                          get, update, delete
/// /bank-movements/{id}/reconcile                link to an issued invoice
///
/// /price-lists                                  list, create
/// /price-lists/{id}                             get, update, delete
/// /price-lists/{id}/reprice                     bulk percentage change
/// /price-lists/{id}/items                       list, upsert
/// /price-lists/{id}/items/{item_id}             get, update, delete
///
/// /stock-movements                              list, create
/// /stock-movements/levels                       on-hand quantities
/// /stock-movements/{id}                         get, update, delete
///
/// /shifts                                       list, create
/// /shifts/current                               shifts running at a time
/// /shifts/{id}                                  get, update, delete
///
/// /payment-methods                              list, create
/// /payment-methods/{id}                         get, update, delete
/// /payment-methods/{id}/schedule                instalment preview
///
/// /suppliers                                    list, create
/// /suppliers/{id}                               get, update, delete
///
/// /work-orders                                  list, create
/// /work-orders/{id}                             get, update, delete
/// /work-orders/{id}/lines                       replace lines
/// /work-orders/{id}/status                      change status
/// /work-orders/{id}/invoice                     convert to draft invoice
///
/// /planning                                     day-by-day calendar
///
/// /invoices                                     list, create
/// /invoices/{id}                                get, update, delete
/// /invoices/{id}/lines                          replace lines
/// /invoices/{id}/lines/move                     move a line
/// /invoices/{id}/lines/{position}/duplicate     duplicate a line
/// /invoices/{id}/issue                          assign number, freeze
/// /invoices/{id}/cancel                         cancel
/// /invoices/{id}/due-dates                      instalment schedule
///
/// /preferences/grids/{grid_key}                 get, save, reset
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        // Master data.
        .nest("/preparation-zones", preparation_zones::router())
        .nest("/product-families", product_families::router())
        .nest("/sales-agents", sales_agents::router())
        .nest("/shifts", shifts::router())
        .nest("/payment-methods", payment_methods::router())
        .nest("/suppliers", suppliers::router())
        .nest("/price-lists", price_lists::router())
        // Operations.
        .nest("/bank-movements", bank_movements::router())
        .nest("/stock-movements", stock_movements::router())
        .nest("/work-orders", work_orders::router())
        .nest("/planning", work_orders::planning_router())
        .nest("/invoices", invoices::router())
        // Per-user settings.
        .nest("/preferences", preferences::router())
}
