mod common;

use catalog_core::{parse_price, Category, Product, ProductFilter, ProductRepository};
use common::ProductFactory;
use rust_decimal::Decimal;

#[test]
fn find_by_name_matches_manual_count() {
    let conn = common::open_store();
    let repo = common::repo(&conn);
    let products = ProductFactory::new(10).create_batch(&repo, 5);

    let first_name = products[0].name.clone();
    let matches = products.iter().filter(|p| p.name == first_name).count() as u64;

    let found = repo.find_by_name(&first_name);
    assert_eq!(found.count().unwrap(), matches);
    for product in &found {
        assert_eq!(product.unwrap().name, first_name);
    }
}

#[test]
fn find_by_availability_matches_manual_count() {
    let conn = common::open_store();
    let repo = common::repo(&conn);
    let products = ProductFactory::new(11).create_batch(&repo, 10);

    let available = products[0].available;
    let matches = products.iter().filter(|p| p.available == available).count() as u64;

    let found = repo.find_by_availability(available);
    assert_eq!(found.count().unwrap(), matches);
    for product in &found {
        assert_eq!(product.unwrap().available, available);
    }
}

#[test]
fn find_by_category_matches_manual_count() {
    let conn = common::open_store();
    let repo = common::repo(&conn);
    let products = ProductFactory::new(12).create_batch(&repo, 10);

    let category = products[0].category;
    let matches = products.iter().filter(|p| p.category == category).count();

    let found = repo.find_by_category(category).fetch_all().unwrap();
    assert_eq!(found.len(), matches);
    assert!(found.iter().all(|p| p.category == category));
}

#[test]
fn find_by_price_matches_manual_count() {
    let conn = common::open_store();
    let repo = common::repo(&conn);
    let products = ProductFactory::new(13).create_batch(&repo, 10);

    let price = products[0].price;
    let matches = products.iter().filter(|p| p.price == price).count() as u64;

    let found = repo.find_by_price(price);
    assert_eq!(found.count().unwrap(), matches);
    for product in &found {
        assert_eq!(product.unwrap().price, price);
    }
}

#[test]
fn find_by_price_uses_decimal_equality() {
    let conn = common::open_store();
    let repo = common::repo(&conn);

    let mut hat = common::fedora();
    repo.create(&mut hat).unwrap();

    for text in ["12.5", "12.50", " 12.500 "] {
        let price = parse_price(text).unwrap();
        assert_eq!(repo.find_by_price(price).count().unwrap(), 1, "{text}");
    }
    assert_eq!(
        repo.find_by_price(Decimal::new(125, 0)).count().unwrap(),
        0
    );
    // Would round onto 12.50 if rescaled before binding.
    let finer = Decimal::new(12_501, 3);
    assert_eq!(repo.find_by_price(finer).count().unwrap(), 0);
    assert!(repo.find_by_price(finer).fetch_all().unwrap().is_empty());
}

#[test]
fn queries_on_empty_store_are_empty() {
    let conn = common::open_store();
    let repo = common::repo(&conn);

    assert_eq!(repo.find_by_name("Hat").count().unwrap(), 0);
    assert_eq!(repo.find_by_category(Category::Food).iter().count(), 0);
    assert!(repo.find_by_availability(true).fetch_all().unwrap().is_empty());
}

#[test]
fn iteration_is_lazy_and_restartable() {
    let conn = common::open_store();
    let repo = common::repo(&conn);
    let mut factory = ProductFactory::new(14);
    factory.create_batch(&repo, 9);

    let query = repo.find_by_availability(true);
    let first: Vec<Product> = query.iter().map(Result::unwrap).collect();

    let mut extra = common::fedora();
    repo.create(&mut extra).unwrap();

    let second: Vec<Product> = query.iter().map(Result::unwrap).collect();
    assert_eq!(second.len(), first.len() + 1);
    assert_eq!(second.last(), Some(&extra));
}

#[test]
fn small_batches_yield_every_row_once_in_id_order() {
    let conn = common::open_store();
    let repo = common::repo(&conn);
    let created = ProductFactory::new(15).create_batch(&repo, 11);

    for batch_size in [0, 1, 2, 3, 11, 50] {
        let listed = repo
            .find_by_name("no such product")
            .with_batch_size(batch_size)
            .fetch_all()
            .unwrap();
        assert!(listed.is_empty());

        let all = catalog_core::ProductQuery::new(&repo, ProductFilter::All)
            .with_batch_size(batch_size)
            .fetch_all()
            .unwrap();
        assert_eq!(all, created, "batch size {batch_size}");
    }
}

#[test]
fn query_results_agree_with_in_memory_filter() {
    let conn = common::open_store();
    let repo = common::repo(&conn);
    let created = ProductFactory::new(16).create_batch(&repo, 20);

    let filters = [
        ProductFilter::Name("Hat".to_string()),
        ProductFilter::Available(false),
        ProductFilter::Category(Category::Automotive),
        ProductFilter::Price(Decimal::new(25, 0)),
    ];
    for filter in filters {
        let expected: Vec<&Product> = created.iter().filter(|p| filter.matches(p)).collect();
        let query = catalog_core::ProductQuery::new(&repo, filter.clone());
        let found = query.fetch_all().unwrap();

        assert_eq!(query.filter(), &filter);
        assert_eq!(query.count().unwrap(), expected.len() as u64);
        assert_eq!(found.iter().collect::<Vec<_>>(), expected);
    }
}
