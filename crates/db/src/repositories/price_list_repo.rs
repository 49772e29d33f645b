//! Repository for the `price_lists` and `price_list_items` tables.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use gestora_core::pagination::PageRequest;
use gestora_core::pricing::ItemPrices;
use gestora_core::types::DbId;

use crate::models::price_list::{
    CreatePriceList, PriceList, PriceListItem, UpdatePriceList, UpsertItem,
};
use crate::models::{ListFilter, Page};

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

/// Column list for price list queries (aliased `l`), with the item count.
const COLUMNS: &str = "\
    l.id, l.code, l.name, l.description, l.valid_from, l.valid_to, l.is_default, \
    l.is_active, \
    (SELECT COUNT(*) FROM price_list_items i WHERE i.price_list_id = l.id) AS item_count, \
    l.created_at, l.updated_at";

const LIST_FILTER: &str = "\
    l.tenant_id = ?1 AND l.deleted_at IS NULL \
    AND (?2 IS NULL OR l.name LIKE ?2 ESCAPE '\\' OR l.code LIKE ?2 ESCAPE '\\') \
    AND (?3 IS NULL OR l.is_active = ?3)";

/// Column list for `price_list_items` queries.
const ITEM_COLUMNS: &str = "\
    id, price_list_id, product_code, product_name, cost_price, sale_price, \
    tax_rate, margin_percent, retail_price, created_at, updated_at";

// ---------------------------------------------------------------------------
// PriceListRepo
// ---------------------------------------------------------------------------

/// Provides CRUD operations for price lists and their items.
pub struct PriceListRepo;

impl PriceListRepo {
    /// List live price lists, default first, then by name.
    pub async fn list(
        pool: &SqlitePool,
        tenant_id: DbId,
        filter: &ListFilter,
        page: &PageRequest,
    ) -> Result<Page<PriceList>, sqlx::Error> {
        let count_query = format!("SELECT COUNT(*) FROM price_lists l WHERE {LIST_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(tenant_id)
            .bind(&filter.search)
            .bind(filter.active)
            .fetch_one(pool)
            .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM price_lists l WHERE {LIST_FILTER} \
             ORDER BY l.is_default DESC, l.name LIMIT ?4 OFFSET ?5"
        );
        let items = sqlx::query_as::<_, PriceList>(&query)
            .bind(tenant_id)
            .bind(&filter.search)
            .bind(filter.active)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        Ok(Page { items, total })
    }

    /// Find a live price list by id.
    pub async fn find_by_id(
        pool: &SqlitePool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<PriceList>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM price_lists l \
             WHERE l.id = ?1 AND l.tenant_id = ?2 AND l.deleted_at IS NULL"
        );
        sqlx::query_as::<_, PriceList>(&query)
            .bind(id)
            .bind(tenant_id)
            .fetch_optional(pool)
            .await
    }

    async fn clear_default(
        conn: &mut SqliteConnection,
        tenant_id: DbId,
        keep_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE price_lists SET is_default = 0 \
             WHERE tenant_id = ?1 AND id <> ?2 AND is_default = 1",
        )
        .bind(tenant_id)
        .bind(keep_id)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Insert a new price list. A default list demotes the previous one.
    pub async fn create(
        pool: &SqlitePool,
        tenant_id: DbId,
        input: &CreatePriceList,
    ) -> Result<PriceList, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO price_lists \
                 (tenant_id, code, name, description, valid_from, valid_to, is_default, \
                  is_active, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, COALESCE(?7, 0), COALESCE(?8, 1), ?9, ?9) \
             RETURNING id",
        )
        .bind(tenant_id)
        .bind(&input.code)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.valid_from)
        .bind(input.valid_to)
        .bind(input.is_default)
        .bind(input.is_active)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        if input.is_default == Some(true) {
            Self::clear_default(&mut tx, tenant_id, id).await?;
        }
        tx.commit().await?;

        Self::find_by_id(pool, tenant_id, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Update a price list. Only non-`None` fields are applied.
    pub async fn update(
        pool: &SqlitePool,
        tenant_id: DbId,
        id: DbId,
        input: &UpdatePriceList,
    ) -> Result<Option<PriceList>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE price_lists SET \
                 code = COALESCE(?3, code), \
                 name = COALESCE(?4, name), \
                 description = COALESCE(?5, description), \
                 valid_from = COALESCE(?6, valid_from), \
                 valid_to = COALESCE(?7, valid_to), \
                 is_default = COALESCE(?8, is_default), \
                 is_active = COALESCE(?9, is_active), \
                 updated_at = ?10 \
             WHERE id = ?1 AND tenant_id = ?2 AND deleted_at IS NULL \
             RETURNING id",
        )
        .bind(id)
        .bind(tenant_id)
        .bind(&input.code)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.valid_from)
        .bind(input.valid_to)
        .bind(input.is_default)
        .bind(input.is_active)
        .bind(Utc::now())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(id) = updated else {
            return Ok(None);
        };
        if input.is_default == Some(true) {
            Self::clear_default(&mut tx, tenant_id, id).await?;
        }
        tx.commit().await?;

        Self::find_by_id(pool, tenant_id, id).await
    }

    /// Soft-delete a price list. Its items are kept for history.
    pub async fn soft_delete(pool: &SqlitePool, tenant_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE price_lists SET deleted_at = ?3, updated_at = ?3, is_default = 0 \
             WHERE id = ?1 AND tenant_id = ?2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(tenant_id)
        .bind(Utc::now())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Items
    // -----------------------------------------------------------------------

    /// List the items of a price list, ordered by product code.
    pub async fn list_items(
        pool: &SqlitePool,
        tenant_id: DbId,
        price_list_id: DbId,
        search: Option<&str>,
        page: &PageRequest,
    ) -> Result<Page<PriceListItem>, sqlx::Error> {
        let filter = "tenant_id = ?1 AND price_list_id = ?2 \
             AND (?3 IS NULL OR product_code LIKE ?3 ESCAPE '\\' \
                  OR product_name LIKE ?3 ESCAPE '\\')";

        let count_query = format!("SELECT COUNT(*) FROM price_list_items WHERE {filter}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(tenant_id)
            .bind(price_list_id)
            .bind(search)
            .fetch_one(pool)
            .await?;

        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM price_list_items WHERE {filter} \
             ORDER BY product_code LIMIT ?4 OFFSET ?5"
        );
        let items = sqlx::query_as::<_, PriceListItem>(&query)
            .bind(tenant_id)
            .bind(price_list_id)
            .bind(search)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        Ok(Page { items, total })
    }

    /// All items of a price list.
    pub async fn all_items(
        pool: &SqlitePool,
        tenant_id: DbId,
        price_list_id: DbId,
    ) -> Result<Vec<PriceListItem>, sqlx::Error> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM price_list_items \
             WHERE tenant_id = ?1 AND price_list_id = ?2 ORDER BY product_code"
        );
        sqlx::query_as::<_, PriceListItem>(&query)
            .bind(tenant_id)
            .bind(price_list_id)
            .fetch_all(pool)
            .await
    }

    /// Find one item of a price list.
    pub async fn find_item(
        pool: &SqlitePool,
        tenant_id: DbId,
        price_list_id: DbId,
        item_id: DbId,
    ) -> Result<Option<PriceListItem>, sqlx::Error> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM price_list_items \
             WHERE id = ?1 AND tenant_id = ?2 AND price_list_id = ?3"
        );
        sqlx::query_as::<_, PriceListItem>(&query)
            .bind(item_id)
            .bind(tenant_id)
            .bind(price_list_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert an item, or overwrite the prices of the list's existing item
    /// with the same product code.
    pub async fn upsert_item(
        pool: &SqlitePool,
        tenant_id: DbId,
        price_list_id: DbId,
        input: &UpsertItem,
    ) -> Result<PriceListItem, sqlx::Error> {
        let p = &input.prices;
        let query = format!(
            "INSERT INTO price_list_items \
                 (tenant_id, price_list_id, product_code, product_name, cost_price, \
                  sale_price, tax_rate, margin_percent, retail_price, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10) \
             ON CONFLICT (price_list_id, product_code) DO UPDATE SET \
                 product_name = excluded.product_name, \
                 cost_price = excluded.cost_price, \
                 sale_price = excluded.sale_price, \
                 tax_rate = excluded.tax_rate, \
                 margin_percent = excluded.margin_percent, \
                 retail_price = excluded.retail_price, \
                 updated_at = excluded.updated_at \
             RETURNING {ITEM_COLUMNS}"
        );
        sqlx::query_as::<_, PriceListItem>(&query)
            .bind(tenant_id)
            .bind(price_list_id)
            .bind(&input.product_code)
            .bind(&input.product_name)
            .bind(p.cost_price)
            .bind(p.sale_price)
            .bind(p.tax_rate)
            .bind(p.margin_percent)
            .bind(p.retail_price)
            .bind(Utc::now())
            .fetch_one(pool)
            .await
    }

    /// Overwrite one item.
    pub async fn update_item(
        pool: &SqlitePool,
        tenant_id: DbId,
        price_list_id: DbId,
        item_id: DbId,
        input: &UpsertItem,
    ) -> Result<Option<PriceListItem>, sqlx::Error> {
        let p = &input.prices;
        let query = format!(
            "UPDATE price_list_items SET \
                 product_code = ?4, product_name = ?5, cost_price = ?6, sale_price = ?7, \
                 tax_rate = ?8, margin_percent = ?9, retail_price = ?10, updated_at = ?11 \
             WHERE id = ?1 AND tenant_id = ?2 AND price_list_id = ?3 \
             RETURNING {ITEM_COLUMNS}"
        );
        sqlx::query_as::<_, PriceListItem>(&query)
            .bind(item_id)
            .bind(tenant_id)
            .bind(price_list_id)
            .bind(&input.product_code)
            .bind(&input.product_name)
            .bind(p.cost_price)
            .bind(p.sale_price)
            .bind(p.tax_rate)
            .bind(p.margin_percent)
            .bind(p.retail_price)
            .bind(Utc::now())
            .fetch_optional(pool)
            .await
    }

    /// Delete one item.
    pub async fn delete_item(
        pool: &SqlitePool,
        tenant_id: DbId,
        price_list_id: DbId,
        item_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM price_list_items WHERE id = ?1 AND tenant_id = ?2 AND price_list_id = ?3",
        )
        .bind(item_id)
        .bind(tenant_id)
        .bind(price_list_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Write recomputed prices for many items in one transaction.
    pub async fn update_prices(
        pool: &SqlitePool,
        tenant_id: DbId,
        price_list_id: DbId,
        prices: &[(DbId, ItemPrices)],
    ) -> Result<u64, sqlx::Error> {
        let now = Utc::now();
        let mut tx = pool.begin().await?;
        let mut updated = 0;

        for (item_id, p) in prices {
            let result = sqlx::query(
                "UPDATE price_list_items SET \
                     cost_price = ?4, sale_price = ?5, tax_rate = ?6, \
                     margin_percent = ?7, retail_price = ?8, updated_at = ?9 \
                 WHERE id = ?1 AND tenant_id = ?2 AND price_list_id = ?3",
            )
            .bind(item_id)
            .bind(tenant_id)
            .bind(price_list_id)
            .bind(p.cost_price)
            .bind(p.sale_price)
            .bind(p.tax_rate)
            .bind(p.margin_percent)
            .bind(p.retail_price)
            .bind(now)
            .execute(&mut *tx)
            .await?;
            updated += result.rows_affected();
        }

        tx.commit().await?;
        Ok(updated)
    }
}
