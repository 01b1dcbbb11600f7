use std::net::SocketAddr;
use std::path::Path;

use base64::{Engine as _, engine::general_purpose};
use bbox_gallery::export::AnnotationExporter;
use bbox_gallery::gallery::{GallerySource, GalleryStore};
use bbox_gallery::http::BasicAuth;
use bbox_gallery::model::{Category, ClassMap};
use bbox_gallery::render::{PageRenderer, Template, TemplateSyntax};
use bbox_gallery::{AppState, build_router};
use image::{Rgb, RgbImage};
use tempfile::{TempDir, tempdir};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

const PAGE: &str = "idx=${idx} total=${total} shown=${display_idx} \
prev=/?idx=${prev_idx} next=/?idx=${next_idx} boxes=${int_list} img=${img_data_uri}";

struct Fixture {
    dir: TempDir,
    addr: SocketAddr,
}

impl Fixture {
    fn annotations(&self) -> std::path::PathBuf {
        self.dir.path().join("annotations")
    }
}

fn write_entry(root: &Path, name: &str, labels: &str) {
    let sub = root.join(name);
    std::fs::create_dir_all(&sub).expect("create subdir");
    RgbImage::from_pixel(8, 6, Rgb([10, 200, 30]))
        .save(sub.join("assembled_image.png"))
        .expect("write image");
    std::fs::write(sub.join("bboxes_labels.json"), labels).expect("write labels");
}

fn state(dir: &TempDir, template: &str) -> AppState {
    state_with_classes(dir, template, &ClassMap::default())
}

fn state_with_classes(dir: &TempDir, template: &str, classes: &ClassMap) -> AppState {
    let root = dir.path().join("data");
    write_entry(&root, "a", "[[1, 2, 3, 4, 0]]");
    write_entry(&root, "b", "[[5, 6, 7, 8, 2], [0, 0, 1, 1, 9]]");
    write_entry(&root, "c", "[]");

    let store =
        GalleryStore::from_source(&GallerySource::scan(&root), classes).expect("build store");
    let renderer = PageRenderer::new(
        Template::parse(template, TemplateSyntax::Dollar).expect("parse template"),
    )
    .expect("renderer");
    let exporter = AnnotationExporter::new(dir.path().join("annotations"));
    AppState::new(store, renderer, exporter)
}

async fn serve(state: AppState, dir: TempDir) -> Fixture {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    Fixture { dir, addr }
}

async fn start() -> Fixture {
    let dir = tempdir().expect("tempdir");
    let state = state(&dir, PAGE);
    serve(state, dir).await
}

async fn send_raw(
    addr: SocketAddr,
    method: &str,
    path: &str,
    headers: &[(&str, &str)],
    body: &str,
) -> (u16, String, String) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let mut req = format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    for (name, value) in headers {
        req.push_str(&format!("{name}: {value}\r\n"));
    }
    if !body.is_empty() {
        req.push_str("Content-Type: application/json\r\n");
    }
    req.push_str(&format!("Content-Length: {}\r\n\r\n{body}", body.len()));
    stream
        .write_all(req.as_bytes())
        .await
        .expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("status");
    (status, head.to_string(), body.to_string())
}

async fn get(addr: SocketAddr, path: &str) -> (u16, String, String) {
    send_raw(addr, "GET", path, &[], "").await
}

async fn post_export(addr: SocketAddr, body: &str) -> (u16, String, String) {
    send_raw(addr, "POST", "/export", &[], body).await
}

#[tokio::test]
async fn page_defaults_to_first_image() {
    let fx = start().await;
    let (status, head, body) = get(fx.addr, "/").await;
    assert_eq!(status, 200);
    assert!(head.to_ascii_lowercase().contains("content-type: text/html"));
    assert!(body.contains("idx=0 total=3 shown=1"));
    assert!(body.contains("prev=/?idx=2 next=/?idx=1"));
    assert!(body.contains(r#"boxes=[[1,2,3,4,"lymphocyte"]]"#));
    assert!(body.contains("img=data:image/jpeg;base64,"));
}

#[tokio::test]
async fn page_index_wraps_in_both_directions() {
    let fx = start().await;

    let (status, _, body) = get(fx.addr, "/?idx=4").await;
    assert_eq!(status, 200);
    assert!(body.contains("idx=1 total=3 shown=2"));
    assert!(body.contains(r#"boxes=[[5,6,7,8,"plasmocyte"],[0,0,1,1,"unknown"]]"#));

    let (status, _, body) = get(fx.addr, "/?idx=-1").await;
    assert_eq!(status, 200);
    assert!(body.contains("idx=2 total=3 shown=3"));
    assert!(body.contains("prev=/?idx=1 next=/?idx=0"));
    assert!(body.contains("boxes=[]"));
}

#[tokio::test]
async fn page_rejects_non_integer_index() {
    let fx = start().await;
    let (status, _, _) = get(fx.addr, "/?idx=abc").await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn export_writes_csv_and_replaces_previous_rows() {
    let fx = start().await;

    let (status, _, body) = post_export(
        fx.addr,
        r#"{"image_idx": 1, "boxes": [[1, 2, 3, 4, "other", 1700000000000]]}"#,
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body, "OK");

    let path = fx.annotations().join("annotations_img1.csv");
    let csv = std::fs::read_to_string(&path).expect("read csv");
    let lines: Vec<&str> = csv.split("\r\n").filter(|l| !l.is_empty()).collect();
    assert_eq!(lines[0], "timestamp,image_path,left,top,right,bottom,class");
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("2023-11-14T22:13:20.000Z,"));
    assert!(lines[1].contains("assembled_image.png"));
    assert!(lines[1].ends_with(",1,2,3,4,other"));

    let (status, _, _) = post_export(
        fx.addr,
        r#"{"image_idx": 1, "boxes": [[9, 9, 9, 9, "plasmocyte"], [8, 8, 8, 8, "other"]]}"#,
    )
    .await;
    assert_eq!(status, 200);

    let csv = std::fs::read_to_string(&path).expect("read csv");
    let rows: Vec<&str> = csv.split("\r\n").filter(|l| !l.is_empty()).collect();
    assert_eq!(rows.len(), 3);
    assert!(rows[1].ends_with(",9,9,9,9,plasmocyte"));
    assert!(!csv.contains("1700000000000"));
}

#[tokio::test]
async fn export_out_of_range_index_records_the_index() {
    let fx = start().await;
    let (status, _, _) =
        post_export(fx.addr, r#"{"image_idx": 7, "boxes": [[1, 1, 2, 2, "other"]]}"#).await;
    assert_eq!(status, 200);

    let csv = std::fs::read_to_string(fx.annotations().join("annotations_img7.csv"))
        .expect("read csv");
    let row = csv.split("\r\n").nth(1).expect("data row");
    assert_eq!(row.split(',').nth(1), Some("7"));
}

#[tokio::test]
async fn export_rejects_bad_bodies() {
    let fx = start().await;

    let (status, _, _) = post_export(fx.addr, "not json").await;
    assert_eq!(status, 400);

    let (status, _, _) = post_export(fx.addr, r#"{"boxes": []}"#).await;
    assert_eq!(status, 400);

    let (status, _, _) = post_export(fx.addr, r#"{"image_idx": "../x", "boxes": []}"#).await;
    assert_eq!(status, 400);

    let (status, _, _) = post_export(fx.addr, r#"{"image_idx": 0, "boxes": [[1, 2, 3]]}"#).await;
    assert_eq!(status, 400);
    assert!(!fx.annotations().join("annotations_img0.csv").exists());
}

#[tokio::test]
async fn export_with_no_boxes_writes_header_only() {
    let fx = start().await;
    let (status, _, _) = post_export(fx.addr, r#"{"image_idx": 2, "boxes": []}"#).await;
    assert_eq!(status, 200);

    let csv = std::fs::read_to_string(fx.annotations().join("annotations_img2.csv"))
        .expect("read csv");
    assert_eq!(
        csv,
        "timestamp,image_path,left,top,right,bottom,class\r\n"
    );
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let fx = start().await;
    let (status, _, _) = get(fx.addr, "/missing").await;
    assert_eq!(status, 404);
}

async fn start_with_auth() -> Fixture {
    let dir = tempdir().expect("tempdir");
    let state = state(&dir, PAGE).with_auth(BasicAuth::new("alice", "s3cret", "gallery"));
    serve(state, dir).await
}

fn basic(credentials: &str) -> String {
    format!("Basic {}", general_purpose::STANDARD.encode(credentials))
}

#[tokio::test]
async fn auth_challenges_missing_credentials() {
    let fx = start_with_auth().await;

    let (status, head, _) = get(fx.addr, "/").await;
    assert_eq!(status, 401);
    assert!(
        head.to_ascii_lowercase()
            .contains("www-authenticate: basic realm=\"gallery\"")
    );

    let (status, _, _) = post_export(fx.addr, r#"{"image_idx": 0, "boxes": []}"#).await;
    assert_eq!(status, 401);
    assert!(!fx.annotations().exists());
}

#[tokio::test]
async fn auth_rejects_wrong_password() {
    let fx = start_with_auth().await;
    let header = basic("alice:nope");
    let (status, _, _) = send_raw(fx.addr, "GET", "/", &[("Authorization", &header)], "").await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn auth_accepts_matching_credentials() {
    let fx = start_with_auth().await;
    let header = basic("alice:s3cret");

    let (status, _, body) =
        send_raw(fx.addr, "GET", "/?idx=1", &[("Authorization", &header)], "").await;
    assert_eq!(status, 200);
    assert!(body.contains("idx=1"));

    let (status, _, body) = send_raw(
        fx.addr,
        "POST",
        "/export",
        &[("Authorization", &header)],
        r#"{"image_idx": 0, "boxes": []}"#,
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn auth_rejects_undecodable_credentials() {
    let fx = start_with_auth().await;

    let (status, _, _) =
        send_raw(fx.addr, "GET", "/", &[("Authorization", "Basic !!!notbase64")], "").await;
    assert_eq!(status, 400);

    let header = basic("no-colon-here");
    let (status, _, _) = send_raw(fx.addr, "GET", "/", &[("Authorization", &header)], "").await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn bundled_template_renders_navigation() {
    let dir = tempdir().expect("tempdir");
    let template = std::fs::read_to_string(
        Path::new(env!("CARGO_MANIFEST_DIR")).join("templates/app.html"),
    )
    .expect("read bundled template");
    let state = state(&dir, &template);
    let fx = serve(state, dir).await;

    let (status, _, body) = get(fx.addr, "/?idx=1").await;
    assert_eq!(status, 200);
    assert!(body.contains(r#"href="/?idx=0""#));
    assert!(body.contains(r#"href="/?idx=2""#));
    assert!(body.contains("const IMAGE_IDX = 1;"));
    assert!(!body.contains("${"));
}

#[tokio::test]
async fn bundled_template_offers_configured_labels() {
    let dir = tempdir().expect("tempdir");
    let template = std::fs::read_to_string(
        Path::new(env!("CARGO_MANIFEST_DIR")).join("templates/app.html"),
    )
    .expect("read bundled template");
    let classes = ClassMap::new(vec![Category::new(0, "mitosis"), Category::new(2, "necrosis")]);
    let state = state_with_classes(&dir, &template, &classes);
    let fx = serve(state, dir).await;

    let (status, _, body) = get(fx.addr, "/?idx=1").await;
    assert_eq!(status, 200);
    // the page merges labels of the loaded boxes into its relabel list
    assert!(body.contains(r#"const LOADED = [[5,6,7,8,"necrosis"],[0,0,1,1,"unknown"]];"#));
    assert!(body.contains("CLASSES.push(b[4])"));
}
