use backstage_social::youtube::{
    ExtractError, ExtractOptions, extract_latest_post, extract_latest_post_with, extract_posts,
    locate, navigate,
};
use serde_json::json;

const PAGE: &str = include_str!("fixtures/community_page.html");

fn wrap_blob(blob: &serde_json::Value) -> String {
    format!(
        "<html><body><script>var ytInitialData = {blob};</script></body></html>"
    )
}

fn post_item(id: &str) -> serde_json::Value {
    json!({
        "backstagePostThreadRenderer": {
            "post": { "backstagePostRenderer": { "postId": id } }
        }
    })
}

#[test]
fn latest_post_from_channel_page() {
    let post = extract_latest_post(PAGE).unwrap().expect("a post");
    assert_eq!(post.post_id, "UgkxLatestPost");
    assert_eq!(post.author, "Canal de Prueba");
    assert_eq!(post.content, "¡Nuevo video mañana! #estreno No olviden };");
    assert_eq!(post.published_time, "hace 2 horas");
    assert_eq!(
        post.images,
        vec!["https://yt3.ggpht.com/a=s1080", "https://yt3.ggpht.com/b=s1080"]
    );
}

#[test]
fn all_posts_keep_page_order_and_skip_non_posts() {
    let posts = extract_posts(PAGE, &ExtractOptions::default()).unwrap();
    let ids: Vec<&str> = posts.iter().map(|p| p.post_id.as_str()).collect();
    assert_eq!(ids, vec!["UgkxLatestPost", "UgkxSecondPost", "UgkxThirdPost"]);

    let third = &posts[2];
    assert_eq!(third.author, "Desconocido");
    assert_eq!(third.published_time, "No disponible");
    assert_eq!(third.content, "Encuesta");
    assert!(third.images.is_empty());
}

#[test]
fn extraction_is_idempotent() {
    let first = serde_json::to_string(&extract_latest_post(PAGE).unwrap()).unwrap();
    let second = serde_json::to_string(&extract_latest_post(PAGE).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn unmatched_titles_fall_back_to_first_tab() {
    // The first tab ("Inicio") is a video grid, so there are no sections to read.
    let opts = ExtractOptions::with_tab_titles(["Community"]);
    assert_eq!(extract_latest_post_with(PAGE, &opts).unwrap(), None);
}

#[test]
fn sections_are_flattened_in_order_and_first_is_latest() {
    let blob = json!({
        "contents": { "twoColumnBrowseResultsRenderer": { "tabs": [
            { "tabRenderer": { "title": "Inicio" } },
            { "tabRenderer": { "title": "Comunidad", "content": { "sectionListRenderer": { "contents": [
                { "itemSectionRenderer": { "contents": [ post_item("s1-i1") ] } },
                { "itemSectionRenderer": { "contents": [ post_item("s2-i1"), post_item("s2-i2") ] } }
            ] } } } }
        ] } }
    });
    let html = wrap_blob(&blob);

    let located = locate::locate_blob(&html).unwrap();
    let items = navigate::collect_items(&located, &ExtractOptions::default()).unwrap();
    let ids: Vec<&str> = items
        .iter()
        .map(|i| i["backstagePostThreadRenderer"]["post"]["backstagePostRenderer"]["postId"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["s1-i1", "s2-i1", "s2-i2"]);

    let latest = extract_latest_post(&html).unwrap().unwrap();
    assert_eq!(latest.post_id, "s1-i1");
}

#[test]
fn page_without_marker_is_not_found() {
    let html = "<html><head><script>var ytcfg = {};</script></head><body>hola</body></html>";
    assert!(matches!(
        extract_latest_post(html),
        Err(ExtractError::NotFound { .. })
    ));
}

#[test]
fn broken_blob_is_parse_error() {
    let html = "<html><body><script>var ytInitialData = {\"contents\": [1, 2,, 3]};</script></body></html>";
    assert!(matches!(extract_latest_post(html), Err(ExtractError::Parse(_))));
}

#[test]
fn blob_without_tabs_is_structure_error() {
    let html = wrap_blob(&json!({ "contents": { "singleColumnBrowseResultsRenderer": {} } }));
    assert!(matches!(
        extract_latest_post(&html),
        Err(ExtractError::Structure(_))
    ));
}

#[test]
fn community_tab_without_posts_is_none() {
    let html = wrap_blob(&json!({
        "contents": { "twoColumnBrowseResultsRenderer": { "tabs": [
            { "tabRenderer": { "title": "Comunidad", "content": { "sectionListRenderer": { "contents": [
                { "itemSectionRenderer": { "contents": [ { "messageRenderer": { "text": "Este canal no tiene publicaciones" } } ] } }
            ] } } } }
        ] } }
    }));
    assert_eq!(extract_latest_post(&html).unwrap(), None);
}
