use super::*;

fn consumable(sku: &str) -> ConsumableProduct {
    ConsumableProduct {
        sku: sku.to_string(),
        title: "Test Product".to_string(),
        description: "A product used in tests".to_string(),
        price_micros: Micros(1_990_000),
        purchase_type: PurchaseType::Consumable,
    }
}

fn subscription(product_id: &str, base_plan_id: &str) -> Subscription {
    Subscription {
        product_id: product_id.to_string(),
        title: "Test Plan".to_string(),
        description: "A subscription used in tests".to_string(),
        base_plan: BasePlan {
            base_plan_id: base_plan_id.to_string(),
            billing_period: BillingPeriod::Monthly,
            price_micros: Micros(4_990_000),
            auto_renewing: true,
        },
    }
}

#[test]
fn builtin_catalog_has_four_consumables_and_three_subscriptions() {
    let catalog = Catalog::builtin();
    assert_eq!(catalog.consumables.len(), 4);
    assert_eq!(catalog.subscriptions.len(), 3);
    assert_eq!(catalog.len(), 7);
    assert!(!catalog.is_empty());
}

#[test]
fn builtin_catalog_passes_validation() {
    assert!(validate_catalog(&Catalog::builtin()).is_ok());
}

#[test]
fn builtin_catalog_preserves_list_order() {
    let catalog = Catalog::builtin();
    let skus: Vec<&str> = catalog.consumables.iter().map(|p| p.sku.as_str()).collect();
    assert_eq!(
        skus,
        [
            "single_system",
            "complete_reading",
            "compatibility_overlay",
            "nuclear_package"
        ]
    );
    let ids: Vec<&str> = catalog
        .subscriptions
        .iter()
        .map(|s| s.product_id.as_str())
        .collect();
    assert_eq!(
        ids,
        ["basic_monthly", "yearly_subscription", "billionaire_yearly"]
    );
}

#[test]
fn builtin_single_system_price() {
    let catalog = Catalog::builtin();
    assert_eq!(catalog.consumables[0].price_micros, Micros(13_990_000));
}

#[test]
fn load_catalog_from_repo_file_matches_builtin() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("config")
        .join("catalog.yaml");
    assert!(
        path.exists(),
        "catalog.yaml missing at {path:?} — required for this test"
    );
    let loaded = load_catalog(&path).expect("catalog.yaml should load");
    assert_eq!(loaded, Catalog::builtin());
}

#[test]
fn load_catalog_missing_file_is_io_error() {
    let err = load_catalog(Path::new("/nonexistent/catalog.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::CatalogFileIo { ref path, .. } if path.contains("nonexistent")));
}

#[test]
fn yaml_defaults_purchase_type_and_auto_renewing() {
    let yaml = r"
consumables:
  - sku: gems_100
    title: 100 Gems
    description: A pile of gems
    price_micros: 990000
subscriptions:
  - product_id: pro
    title: Pro
    description: Pro tier
    base_plan:
      base_plan_id: pro-monthly
      billing_period: monthly
      price_micros: 4990000
";
    let catalog: Catalog = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(catalog.consumables[0].purchase_type, PurchaseType::Consumable);
    assert!(catalog.subscriptions[0].base_plan.auto_renewing);
    assert!(validate_catalog(&catalog).is_ok());
}

#[test]
fn yaml_rejects_negative_price() {
    let yaml = r"
consumables:
  - sku: gems_100
    title: 100 Gems
    description: A pile of gems
    price_micros: -5
";
    assert!(serde_yaml::from_str::<Catalog>(yaml).is_err());
}

#[test]
fn yaml_rejects_unknown_billing_period() {
    let yaml = r"
subscriptions:
  - product_id: pro
    title: Pro
    description: Pro tier
    base_plan:
      base_plan_id: pro-weekly
      billing_period: weekly
      price_micros: 990000
";
    assert!(serde_yaml::from_str::<Catalog>(yaml).is_err());
}

#[test]
fn validate_rejects_empty_catalog() {
    let err = validate_catalog(&Catalog::default()).unwrap_err();
    assert!(err.to_string().contains("at least one"));
}

#[test]
fn validate_rejects_blank_title() {
    let mut product = consumable("gems_100");
    product.title = "   ".to_string();
    let catalog = Catalog {
        consumables: vec![product],
        subscriptions: vec![],
    };
    let err = validate_catalog(&catalog).unwrap_err();
    assert!(err.to_string().contains("empty title"));
}

#[test]
fn validate_rejects_uppercase_sku() {
    let catalog = Catalog {
        consumables: vec![consumable("Gems100")],
        subscriptions: vec![],
    };
    let err = validate_catalog(&catalog).unwrap_err();
    assert!(err.to_string().contains("invalid sku 'Gems100'"));
}

#[test]
fn validate_rejects_empty_sku() {
    let catalog = Catalog {
        consumables: vec![consumable("")],
        subscriptions: vec![],
    };
    assert!(validate_catalog(&catalog).is_err());
}

#[test]
fn validate_rejects_underscore_in_base_plan_id() {
    let catalog = Catalog {
        consumables: vec![],
        subscriptions: vec![subscription("pro", "pro_monthly")],
    };
    let err = validate_catalog(&catalog).unwrap_err();
    assert!(err.to_string().contains("invalid base_plan_id 'pro_monthly'"));
}

#[test]
fn validate_rejects_overlong_base_plan_id() {
    let long_id = "a".repeat(64);
    let catalog = Catalog {
        consumables: vec![],
        subscriptions: vec![subscription("pro", &long_id)],
    };
    assert!(validate_catalog(&catalog).is_err());
}

#[test]
fn validate_allows_duplicate_skus() {
    // Duplicates are surfaced by the remote conflict response, not locally.
    let catalog = Catalog {
        consumables: vec![consumable("gems_100"), consumable("gems_100")],
        subscriptions: vec![],
    };
    assert!(validate_catalog(&catalog).is_ok());
}

#[test]
fn billing_period_encodings() {
    assert_eq!(BillingPeriod::Monthly.iso8601(), "P1M");
    assert_eq!(BillingPeriod::Yearly.iso8601(), "P1Y");
    assert_eq!(BillingPeriod::Monthly.unit_label(), "month");
    assert_eq!(BillingPeriod::Yearly.unit_label(), "year");
    assert_eq!(BillingPeriod::Yearly.to_string(), "yearly");
}

#[test]
fn consumable_purchase_type_maps_to_managed_user() {
    assert_eq!(PurchaseType::Consumable.api_value(), "managedUser");
    assert_eq!(PurchaseType::Consumable.to_string(), "consumable");
}
