use super::*;

fn bullets(n: usize) -> BulletList {
    BulletList::new((0..n).map(|i| format!("b{i}")).collect())
}

#[test]
fn add_never_grows_past_max() {
    let mut list = bullets(3);
    assert!(list.add_bullet());
    assert!(list.add_bullet());
    assert_eq!(list.len(), BulletList::MAX);
    for _ in 0..10 {
        assert!(!list.add_bullet());
    }
    assert_eq!(list.len(), BulletList::MAX);
    assert_eq!(list.as_slice()[4], "");
}

#[test]
fn remove_never_shrinks_below_min() {
    let mut list = bullets(4);
    assert!(list.remove_bullet(1));
    assert_eq!(list.as_slice(), ["b0", "b2", "b3"]);
    assert!(list.remove_bullet(0));
    for i in 0..4 {
        assert!(!list.remove_bullet(i));
    }
    assert_eq!(list.as_slice(), ["b2", "b3"]);
}

#[test]
fn remove_out_of_range_is_noop() {
    let mut list = bullets(4);
    assert!(!list.remove_bullet(9));
    assert_eq!(list.len(), 4);
}

#[test]
fn construction_clamps_into_bounds() {
    assert_eq!(bullets(0).as_slice(), ["", ""]);
    assert_eq!(bullets(1).as_slice(), ["b0", ""]);
    assert_eq!(bullets(9).len(), BulletList::MAX);
    assert_eq!(BulletList::default().len(), 3);
}

#[test]
fn update_by_index_preserves_order() {
    let mut list = bullets(3);
    assert!(list.update_bullet(1, "middle"));
    assert!(!list.update_bullet(1, "middle"));
    assert!(!list.update_bullet(7, "nowhere"));
    assert_eq!(list.as_slice(), ["b0", "middle", "b2"]);
}

#[test]
fn bullet_list_deserializes_with_clamping() {
    let list: BulletList = serde_json::from_str(r#"["only"]"#).unwrap();
    assert_eq!(list.as_slice(), ["only", ""]);
}

#[test]
fn form_set_reports_changes() {
    let mut form = PosterForm::empty();
    assert!(form.set(FormField::ProductName, "Aurora Brew"));
    assert!(!form.set(FormField::ProductName, "Aurora Brew"));
    assert_eq!(form.get(FormField::ProductName), "Aurora Brew");
    assert_eq!(form.get(FormField::BrandName), "");
}

#[test]
fn partial_form_json_uses_defaults() {
    let form: PosterForm = serde_json::from_str(r#"{"product_name":"Aurora Brew"}"#).unwrap();
    assert_eq!(form.product_name, "Aurora Brew");
    assert_eq!(form.brand_name, "Lumen Labs");
}
