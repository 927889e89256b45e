use std::path::Path;

#[test]
fn keeps_split_module_roots_for_jwt() {
    let src = Path::new(env!("CARGO_MANIFEST_DIR")).join("src");
    let legacy_roots = [
        "jwt.rs",
        "jwt/jwks.rs",
        "jwt/verifier.rs",
        "jwt/validator.rs",
        "jwt/generator.rs",
        "jwt/token.rs",
    ];

    let stale_files: Vec<&str> = legacy_roots
        .iter()
        .copied()
        .filter(|path| src.join(path).exists())
        .collect();

    assert!(
        stale_files.is_empty(),
        "legacy module roots found: {stale_files:?}; keep only mod.rs roots under src/jwt",
    );
}
