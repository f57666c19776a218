mod common;

use network_sites::domain::listing::{
    LikePattern, PageWindow, SiteFilter, SiteQuery, SortColumn, SortDirection, SortSpec,
};
use network_sites::domain::repositories::SiteRepository;
use network_sites::infrastructure::persistence::PgSiteRepository;
use sqlx::PgPool;
use std::sync::Arc;

#[sqlx::test]
async fn test_list_is_scoped_to_network(pool: PgPool) {
    let network = common::seed_network(&pool, "subdomain").await;
    let other: i64 = sqlx::query_scalar(
        "INSERT INTO networks (domain, path, install_mode) VALUES ('other.org', '/', 'subdomain') RETURNING id",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    common::create_site(&pool, other, "a.other.org", "/").await;
    let repo = PgSiteRepository::new(Arc::new(pool));

    let query = SiteQuery::new(
        &network,
        SiteFilter::All,
        SortSpec::unsorted(),
        PageWindow::new(1, 20),
    );

    let sites = repo.list(&query).await.unwrap();
    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].id, network.main_site_id);
    assert_eq!(repo.count(&query.count_query()).await.unwrap(), 1);
    assert_eq!(repo.count_sites(other, 10).await.unwrap(), 1);
}

#[sqlx::test]
async fn test_list_orders_and_pages(pool: PgPool) {
    let network = common::seed_network(&pool, "subdomain").await;
    let a = common::create_site(&pool, network.id, "a.example.com", "/").await;
    let b = common::create_site(&pool, network.id, "b.example.com", "/").await;
    let c = common::create_site(&pool, network.id, "c.example.com", "/").await;
    let repo = PgSiteRepository::new(Arc::new(pool));

    let query = SiteQuery::new(
        &network,
        SiteFilter::IdIn(vec![a, b, c]),
        SortSpec::new(SortColumn::BlogName, SortDirection::Desc),
        PageWindow::new(2, 2),
    );

    let ids: Vec<i64> = repo.list(&query).await.unwrap().iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![a]);
    assert_eq!(repo.count(&query.count_query()).await.unwrap(), 3);
}

#[sqlx::test]
async fn test_domain_like_is_case_insensitive(pool: PgPool) {
    let network = common::seed_network(&pool, "subdomain").await;
    let shop = common::create_site(&pool, network.id, "Shop.example.com", "/").await;
    let repo = PgSiteRepository::new(Arc::new(pool));

    let pattern = LikePattern::new().literal("shop.example.com");
    let query = SiteQuery::new(
        &network,
        SiteFilter::DomainLike(pattern),
        SortSpec::unsorted(),
        PageWindow::new(1, 20),
    );

    let sites = repo.list(&query).await.unwrap();
    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].id, shop);
}

#[sqlx::test]
async fn test_match_ips(pool: PgPool) {
    let network = common::seed_network(&pool, "subdomain").await;
    let shop = common::create_site(&pool, network.id, "shop.example.com", "/").await;
    common::log_registration(&pool, shop, "10.0.0.1").await;
    common::log_registration(&pool, shop, "10.0.0.2").await;
    let repo = PgSiteRepository::new(Arc::new(pool));

    let ids = repo
        .match_ips(&LikePattern::new().literal("10.0.0.").wildcard())
        .await
        .unwrap();
    assert_eq!(ids, vec![shop]);

    let ids = repo
        .match_ips(&LikePattern::new().literal("10.0.0."))
        .await
        .unwrap();
    assert!(ids.is_empty());
}

#[sqlx::test]
async fn test_users_for_site(pool: PgPool) {
    let network = common::seed_network(&pool, "subdomain").await;
    let shop = common::create_site(&pool, network.id, "shop.example.com", "/").await;
    let first = common::add_user(&pool, shop, "alice").await;
    common::add_user(&pool, shop, "bob").await;
    common::add_user(&pool, shop, "carol").await;
    let repo = PgSiteRepository::new(Arc::new(pool));

    let users = repo.users_for_site(shop, 2).await.unwrap();

    assert_eq!(users.len(), 2);
    assert_eq!(users[0].id, first);
    assert_eq!(users[0].email, "alice@example.com");
}

#[sqlx::test]
async fn test_missing_dates_read_as_never(pool: PgPool) {
    let network = common::seed_network(&pool, "subdomain").await;
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO sites (network_id, domain, path) VALUES ($1, 'new.example.com', '/') RETURNING id",
    )
    .bind(network.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    let repo = PgSiteRepository::new(Arc::new(pool));

    let query = SiteQuery::new(
        &network,
        SiteFilter::IdEquals(id),
        SortSpec::unsorted(),
        PageWindow::new(1, 20),
    );
    let site = repo.list(&query).await.unwrap().remove(0);

    assert!(site.registered.is_none());
    assert!(site.last_updated.is_none());
}

#[sqlx::test]
async fn test_count_sites_stops_at_limit(pool: PgPool) {
    let network = common::seed_network(&pool, "subdomain").await;
    for name in ["a", "b", "c", "d"] {
        common::create_site(&pool, network.id, &format!("{name}.example.com"), "/").await;
    }
    let repo = PgSiteRepository::new(Arc::new(pool));

    assert_eq!(repo.count_sites(network.id, 3).await.unwrap(), 3);
    assert_eq!(repo.count_sites(network.id, 100).await.unwrap(), 5);
    assert_eq!(repo.count_sites(network.id, 0).await.unwrap(), 0);
}
