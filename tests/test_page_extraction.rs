mod common;

use common::{RecordingProvider, RECIPE_REPLY};
use recipe_ingest::providers::PAGE_PROMPT;
use recipe_ingest::{Category, ImportError, RecipeExtractor, SourceType};

fn create_recipe_html(json_ld: &str) -> String {
    format!(
        r#"
        <!DOCTYPE html>
        <html>
        <head>
            <title>Recipe Page</title>
            <meta property="og:image" content="https://example.com/pancakes.jpg">
            <script type="application/ld+json">
                {json_ld}
            </script>
        </head>
        <body>
            <h1>Recipe</h1>
            <p>My grandmother made these every Sunday.</p>
        </body>
        </html>
        "#
    )
}

#[tokio::test]
async fn test_structured_page_sends_digest() {
    let mut server = mockito::Server::new_async().await;
    let html = create_recipe_html(
        r#"{"@type":"Recipe","name":"Pancakes","recipeIngredient":["2 cups flour","1 egg"],"recipeInstructions":["Mix","Cook"]}"#,
    );
    let mock = server
        .mock("GET", "/pancakes")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(html)
        .create_async()
        .await;

    let provider = RecordingProvider::new(RECIPE_REPLY);
    let extractor = RecipeExtractor::builder().build().unwrap();
    let url = format!("{}/pancakes", server.url());

    let recipe = extractor.extract(&provider, &url).await.unwrap();
    mock.assert_async().await;

    let calls = provider.calls();
    assert_eq!(calls.len(), 1);
    let (system, content) = &calls[0];
    assert_eq!(system, PAGE_PROMPT);
    assert!(content.contains("Title: Pancakes"));
    assert!(content.contains("Ingredients:\n2 cups flour\n1 egg"));
    assert!(content.contains("Instructions:\n1. Mix\n2. Cook"));
    assert!(!content.contains("grandmother"));
    assert!(!content.contains("<script"));

    assert_eq!(recipe.title, "Pancakes");
    assert_eq!(recipe.servings, Some(4));
    assert_eq!(recipe.ingredients[0].category, Category::Pantry);
    assert_eq!(recipe.ingredients[1].category, Category::DairyEggs);
    assert_eq!(recipe.instructions, vec!["Mix", "Cook"]);
    assert_eq!(recipe.source_url.as_deref(), Some(url.as_str()));
    assert_eq!(recipe.source_type, SourceType::Url);
    // the reply carries no image, so the page's og:image is used
    assert_eq!(
        recipe.image_url.as_deref(),
        Some("https://example.com/pancakes.jpg")
    );
}

#[tokio::test]
async fn test_graph_wrapped_recipe() {
    let mut server = mockito::Server::new_async().await;
    let html = create_recipe_html(
        r#"{"@context":"https://schema.org","@graph":[{"@type":"WebPage","name":"Home"},{"@type":["Recipe","NewsArticle"],"name":"Black Bean Soup","recipeYield":["6","6 bowls"],"prepTime":"PT10M","cookTime":"PT1H30M","recipeIngredient":["2 cans black beans"],"recipeInstructions":[{"@type":"HowToStep","text":"Simmer."}]}]}"#,
    );
    let _m = server
        .mock("GET", "/soup")
        .with_status(200)
        .with_body(html)
        .create_async()
        .await;

    let provider = RecordingProvider::new(RECIPE_REPLY);
    let extractor = RecipeExtractor::builder().build().unwrap();
    extractor
        .extract(&provider, &format!("{}/soup", server.url()))
        .await
        .unwrap();

    let (_, content) = &provider.calls()[0];
    assert!(content.contains("Title: Black Bean Soup"));
    assert!(content.contains("Servings: 6\n"));
    assert!(content.contains("Prep Time: 10 minutes"));
    assert!(content.contains("Cook Time: 1 hour 30 minutes"));
    assert!(content.contains("1. Simmer."));
}

#[tokio::test]
async fn test_page_without_structured_data_sends_plain_text() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/blog")
        .with_status(200)
        .with_body(
            r#"<html><head><style>p { color: red }</style><script>track()</script></head>
            <body><h1>Grandma's   Stew</h1><p>Brown the beef &amp; onions.</p></body></html>"#,
        )
        .create_async()
        .await;

    let provider = RecordingProvider::new(RECIPE_REPLY);
    let extractor = RecipeExtractor::builder().build().unwrap();
    extractor
        .extract(&provider, &format!("{}/blog", server.url()))
        .await
        .unwrap();

    let (system, content) = &provider.calls()[0];
    assert_eq!(system, PAGE_PROMPT);
    assert!(content.contains("Grandma's Stew"));
    assert!(content.contains("Brown the beef & onions."));
    assert!(!content.contains("track()"));
    assert!(!content.contains("color: red"));
}

#[tokio::test]
async fn test_no_recipe_reply_is_extraction_error() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/about")
        .with_status(200)
        .with_body("<html><body><p>About us</p></body></html>")
        .create_async()
        .await;

    let provider = RecordingProvider::new(r#"{"error": "No recipe found"}"#);
    let extractor = RecipeExtractor::builder().build().unwrap();
    let err = extractor
        .extract(&provider, &format!("{}/about", server.url()))
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::NoRecipeFound { .. }));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_page_fetch_failure_skips_provider() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/broken")
        .with_status(503)
        .create_async()
        .await;

    let provider = RecordingProvider::new(RECIPE_REPLY);
    let extractor = RecipeExtractor::builder().build().unwrap();
    let err = extractor
        .extract(&provider, &format!("{}/broken", server.url()))
        .await
        .unwrap_err();
    assert!(err.is_retryable());
    assert!(provider.calls().is_empty());
}
