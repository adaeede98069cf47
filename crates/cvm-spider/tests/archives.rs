use cvm_spider::dfp::archives::{scrape, zip_links};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const INDEX: &str = r#"
<html><body><pre>
<a href="../">../</a>
<a href="dfp_cia_aberta_2020.zip">dfp_cia_aberta_2020.zip</a>
<a href="dfp_cia_aberta_2021.zip">dfp_cia_aberta_2021.zip</a>
<a href="META/">META/</a>
<a href="notes.txt">notes.txt</a>
</pre></body></html>
"#;

#[test]
fn lists_zip_links() {
    assert_eq!(
        zip_links(INDEX),
        vec!["dfp_cia_aberta_2020.zip", "dfp_cia_aberta_2021.zip"]
    );
}

#[tokio::test]
async fn downloads_missing_archives() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/DADOS/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(INDEX))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/DADOS/dfp_cia_aberta_2020.zip"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"2020".to_vec()))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/DADOS/dfp_cia_aberta_2021.zip"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"2021".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let zip_dir = dir.path().join("zips");
    std::fs::create_dir_all(&zip_dir).unwrap();
    std::fs::write(zip_dir.join("dfp_cia_aberta_2020.zip"), "already here").unwrap();

    let client = reqwest::Client::new();
    let index_url = format!("{}/DADOS/", server.uri());
    let downloaded = scrape(&client, &index_url, &zip_dir, false).await.unwrap();

    assert_eq!(downloaded, vec![zip_dir.join("dfp_cia_aberta_2021.zip")]);
    assert_eq!(
        std::fs::read(zip_dir.join("dfp_cia_aberta_2021.zip")).unwrap(),
        b"2021"
    );
    assert_eq!(
        std::fs::read_to_string(zip_dir.join("dfp_cia_aberta_2020.zip")).unwrap(),
        "already here"
    );
}

#[tokio::test]
async fn failed_downloads_abort() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/DADOS/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(INDEX))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/DADOS/dfp_cia_aberta_2020.zip"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let client = reqwest::Client::new();
    let index_url = format!("{}/DADOS/", server.uri());
    assert!(scrape(&client, &index_url, dir.path(), false).await.is_err());
}
