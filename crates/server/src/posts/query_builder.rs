//! Post listing query construction using SeaQuery.
//!
//! Produces the matched (count, data) statement pair for the listing
//! endpoint. Both statements are assembled from the same join and filter
//! methods so their WHERE predicates and bound values cannot drift apart.
//! User-supplied terms travel as bound values, never as statement text.

use sea_query::extension::postgres::PgExpr;
use sea_query::{
    Alias, Asterisk, Cond, Expr, ExprTrait, Iden, Order, PostgresQueryBuilder, Query,
    SelectStatement,
};
use sea_query_binder::{SqlxBinder, SqlxValues};

use super::types::PostFilter;

/// `posts` table columns.
#[derive(Iden)]
enum Posts {
    Table,
    Id,
    Image,
    CategoryId,
    Title,
    Description,
    UserId,
    CreatedAt,
    LikesCount,
    Content,
}

/// `users` lookup table columns.
#[derive(Iden)]
enum Users {
    Table,
    Id,
    Name,
}

/// `categories` lookup table columns.
#[derive(Iden)]
enum Categories {
    Table,
    Id,
    Name,
}

/// Builder for the post listing statement pair.
pub struct PostQueryBuilder {
    filter: PostFilter,
}

impl PostQueryBuilder {
    /// Create a builder for a normalized filter.
    pub fn new(filter: PostFilter) -> Self {
        Self { filter }
    }

    /// Build the data statement with joins, ordering, and pagination.
    pub fn build(&self, page_size: u32) -> (String, SqlxValues) {
        self.data_statement(page_size).build_sqlx(PostgresQueryBuilder)
    }

    /// Build the count statement sharing the data statement's predicates.
    pub fn build_count(&self) -> (String, SqlxValues) {
        self.count_statement().build_sqlx(PostgresQueryBuilder)
    }

    fn data_statement(&self, page_size: u32) -> SelectStatement {
        let mut query = Query::select();

        query
            .column((Posts::Table, Posts::Id))
            .column((Posts::Table, Posts::Image))
            .expr_as(
                Expr::col((Categories::Table, Categories::Name)),
                Alias::new("category"),
            )
            .column((Posts::Table, Posts::Title))
            .column((Posts::Table, Posts::Description))
            .expr_as(Expr::col((Users::Table, Users::Name)), Alias::new("author"))
            .column((Posts::Table, Posts::CreatedAt))
            .expr_as(
                Expr::col((Posts::Table, Posts::LikesCount)),
                Alias::new("likes"),
            )
            .column((Posts::Table, Posts::Content))
            .from(Posts::Table);

        self.add_joins(&mut query);
        self.add_filters(&mut query);

        // Newest first; id breaks creation-time ties so pages stay disjoint.
        query
            .order_by((Posts::Table, Posts::CreatedAt), Order::Desc)
            .order_by((Posts::Table, Posts::Id), Order::Desc)
            .limit(u64::from(page_size))
            .offset(self.filter.offset(page_size));

        query
    }

    fn count_statement(&self) -> SelectStatement {
        let mut query = Query::select();

        query.expr(Expr::col(Asterisk).count()).from(Posts::Table);

        self.add_joins(&mut query);
        self.add_filters(&mut query);

        query
    }

    /// LEFT JOIN the lookup tables; posts survive null or dangling keys.
    fn add_joins(&self, query: &mut SelectStatement) {
        query.left_join(
            Users::Table,
            Expr::col((Posts::Table, Posts::UserId)).equals((Users::Table, Users::Id)),
        );
        query.left_join(
            Categories::Table,
            Expr::col((Posts::Table, Posts::CategoryId)).equals((Categories::Table, Categories::Id)),
        );
    }

    /// Append one bound predicate per supplied term.
    ///
    /// Both terms present means both predicates apply (intersection).
    fn add_filters(&self, query: &mut SelectStatement) {
        if let Some(ref category) = self.filter.category {
            query.and_where(
                Expr::col((Categories::Table, Categories::Name)).ilike(contains_pattern(category)),
            );
        }

        if let Some(ref keyword) = self.filter.keyword {
            let pattern = contains_pattern(keyword);
            query.cond_where(
                Cond::any()
                    .add(Expr::col((Posts::Table, Posts::Title)).ilike(pattern.as_str()))
                    .add(Expr::col((Posts::Table, Posts::Content)).ilike(pattern.as_str())),
            );
        }
    }
}

/// Wrap a term in both-side wildcards for "contains" semantics.
fn contains_pattern(term: &str) -> String {
    format!("%{}%", escape_like_wildcards(term))
}

/// Escape SQL LIKE wildcard characters (`%`, `_`, `\`) in a value.
fn escape_like_wildcards(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn filter(category: Option<&str>, keyword: Option<&str>, page: &str) -> PostFilter {
        PostFilter::from_raw(category, keyword, Some(page))
    }

    fn render(builder: &PostQueryBuilder, page_size: u32) -> String {
        builder.data_statement(page_size).to_string(PostgresQueryBuilder)
    }

    fn render_count(builder: &PostQueryBuilder) -> String {
        builder.count_statement().to_string(PostgresQueryBuilder)
    }

    #[test]
    fn unfiltered_listing() {
        let builder = PostQueryBuilder::new(filter(None, None, "1"));
        let sql = render(&builder, 6);

        assert!(!sql.contains("WHERE"), "no predicates expected: {sql}");
        assert!(sql.contains("LEFT JOIN \"users\""));
        assert!(sql.contains("LEFT JOIN \"categories\""));
        assert!(sql.contains("ORDER BY \"posts\".\"created_at\" DESC, \"posts\".\"id\" DESC"));
        assert!(sql.contains("LIMIT 6"));
        assert!(sql.contains("OFFSET 0"));
    }

    #[test]
    fn category_filter_matches_category_name() {
        let builder = PostQueryBuilder::new(filter(Some("travel"), None, "1"));
        let sql = render(&builder, 6);

        assert!(sql.contains("\"categories\".\"name\" ILIKE"), "{sql}");
        assert!(sql.contains("%travel%"), "{sql}");
    }

    #[test]
    fn keyword_filter_searches_title_or_content() {
        let builder = PostQueryBuilder::new(filter(None, Some("rust"), "1"));
        let sql = render(&builder, 6);

        assert!(sql.contains("\"posts\".\"title\" ILIKE"), "{sql}");
        assert!(sql.contains("\"posts\".\"content\" ILIKE"), "{sql}");
        assert!(sql.contains(" OR "), "{sql}");
    }

    #[test]
    fn combined_filters_intersect() {
        let builder = PostQueryBuilder::new(filter(Some("travel"), Some("rust"), "1"));
        let sql = render(&builder, 6);

        assert!(sql.contains("\"categories\".\"name\" ILIKE"), "{sql}");
        assert!(sql.contains("\"posts\".\"title\" ILIKE"), "{sql}");
        assert!(sql.contains(" AND "), "{sql}");
        assert!(sql.contains(" OR "), "{sql}");
    }

    #[test]
    fn count_and_data_share_predicates() {
        let builder = PostQueryBuilder::new(filter(Some("travel"), Some("rust"), "2"));
        let data_sql = render(&builder, 6);
        let count_sql = render_count(&builder);

        let data_where = data_sql
            .split_once("WHERE")
            .map(|(_, rest)| rest.split("ORDER BY").next().unwrap_or(rest).trim())
            .unwrap();
        let count_where = count_sql.split_once("WHERE").map(|(_, w)| w.trim()).unwrap();

        assert_eq!(data_where, count_where);
        assert!(count_sql.contains("COUNT(*)"));
        assert!(!count_sql.contains("LIMIT"));
        assert!(!count_sql.contains("ORDER BY"));
    }

    #[test]
    fn pagination_offset() {
        let builder = PostQueryBuilder::new(filter(None, None, "2"));
        let sql = render(&builder, 6);
        assert!(sql.contains("LIMIT 6"));
        assert!(sql.contains("OFFSET 6"));

        let builder = PostQueryBuilder::new(filter(None, None, "3"));
        let sql = render(&builder, 5);
        assert!(sql.contains("LIMIT 5"));
        assert!(sql.contains("OFFSET 10"));
    }

    #[test]
    fn like_wildcards_escaped() {
        let builder = PostQueryBuilder::new(filter(Some("100%_done"), None, "1"));
        let sql = render(&builder, 6);

        assert!(
            !sql.contains("%100%_done%"),
            "raw wildcard chars should not appear unescaped: {sql}"
        );
    }

    #[test]
    fn terms_are_bound_not_inlined() {
        let builder = PostQueryBuilder::new(filter(Some("travel"), Some("rust"), "1"));

        let (sql, values) = builder.build(6);
        assert!(!sql.contains("travel"), "term leaked into SQL text: {sql}");
        assert!(!sql.contains("rust"), "term leaked into SQL text: {sql}");
        assert!(sql.contains("$1"), "{sql}");
        // category + keyword (title) + keyword (content) + limit + offset
        assert_eq!(values.0.0.len(), 5);

        let (count_sql, count_values) = builder.build_count();
        assert!(!count_sql.contains("travel"), "{count_sql}");
        // category + keyword (title) + keyword (content)
        assert_eq!(count_values.0.0.len(), 3);
    }

    #[test]
    fn projection_aliases_joined_columns() {
        let builder = PostQueryBuilder::new(filter(None, None, "1"));
        let sql = render(&builder, 6);

        assert!(sql.contains("AS \"category\""), "{sql}");
        assert!(sql.contains("AS \"author\""), "{sql}");
        assert!(sql.contains("AS \"likes\""), "{sql}");
    }
}
