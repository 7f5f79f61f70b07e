use crate::IniDocument;

#[test]
fn test_parse_sections_and_keys() {
    let doc = IniDocument::parse(
        "[/Script/Astro.AstroServerSettings]\nPublicIP=203.0.113.7\nServerName = My Base \n\n[URL]\nPort=8777\n",
    );

    assert_eq!(
        doc.get("/Script/Astro.AstroServerSettings", "PublicIP"),
        Some("203.0.113.7")
    );
    assert_eq!(
        doc.get("/Script/Astro.AstroServerSettings", "ServerName"),
        Some("My Base")
    );
    assert_eq!(doc.get("URL", "Port"), Some("8777"));
    assert!(doc.has_section("URL"));
}

#[test]
fn test_comments_and_blank_lines_ignored() {
    let doc = IniDocument::parse("; header\n# another\n[A]\n;Key=hidden\nKey=shown\n");

    assert_eq!(doc.get("A", "Key"), Some("shown"));
}

#[test]
fn test_last_value_wins() {
    let doc = IniDocument::parse("[A]\nKey=first\nKey=second\n");

    assert_eq!(doc.get("A", "Key"), Some("second"));
}

#[test]
fn test_quotes_stripped_and_value_may_contain_equals() {
    let doc = IniDocument::parse("[A]\nName=\"Base One\"\nExpr=a=b\n");

    assert_eq!(doc.get("A", "Name"), Some("Base One"));
    assert_eq!(doc.get("A", "Expr"), Some("a=b"));
}

#[test]
fn test_missing_section_or_key_is_none() {
    let doc = IniDocument::parse("[A]\nKey=1\n");

    assert_eq!(doc.get("B", "Key"), None);
    assert_eq!(doc.get("A", "Other"), None);
    assert!(!doc.has_section("B"));
}
