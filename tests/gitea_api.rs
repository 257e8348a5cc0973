//! HTTP-level tests for the Gitea client.
//!
//! Each test stands up a local mock server and checks the requests the client
//! sends and how it maps the responses.

use gitea_release::forge::{
    AttachmentUpload, CreateReleaseRequest, EditReleaseRequest, Forge, ForgeError, GiteaForge,
    TransportConfig,
};
use serde_json::json;
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RELEASES: &str = "/api/v1/repos/octo/app/releases";

fn forge(server: &MockServer) -> GiteaForge {
    GiteaForge::new(
        server.uri(),
        "abc123",
        "octo",
        "app",
        &TransportConfig::default(),
    )
    .unwrap()
}

fn release_json(id: i64, tag: &str) -> serde_json::Value {
    json!({
        "id": id,
        "tag_name": tag,
        "name": tag,
        "body": "",
        "draft": false,
        "prerelease": false,
        "html_url": format!("https://gitea.example.com/octo/app/releases/tag/{}", tag),
        "assets": []
    })
}

mod releases {
    use super::*;

    #[tokio::test]
    async fn list_follows_pages_until_empty() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(RELEASES))
            .and(query_param("page", "1"))
            .and(query_param("limit", "50"))
            .and(header("authorization", "token abc123"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([release_json(1, "v1.0.0"), release_json(2, "v0.9.0")])),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(RELEASES))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([release_json(3, "v0.1.0")])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(RELEASES))
            .and(query_param("page", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let releases = forge(&server).list_releases().await.unwrap();

        let tags: Vec<&str> = releases.iter().map(|r| r.tag_name.as_str()).collect();
        assert_eq!(tags, vec!["v1.0.0", "v0.9.0", "v0.1.0"]);
        assert_eq!(
            releases[0].url.as_deref(),
            Some("https://gitea.example.com/octo/app/releases/tag/v1.0.0")
        );
    }

    #[tokio::test]
    async fn list_stops_at_total_count() {
        let server = MockServer::start().await;

        // Ignores `page` and always returns the same two releases.
        Mock::given(method("GET"))
            .and(path(RELEASES))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-Total-Count", "2")
                    .set_body_json(json!([release_json(1, "v1.0.0"), release_json(2, "v0.9.0")])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let releases = forge(&server).list_releases().await.unwrap();
        assert_eq!(releases.len(), 2);
    }

    #[tokio::test]
    async fn list_gives_up_on_endless_pages() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(RELEASES))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([release_json(1, "v1.0.0")])))
            .expect(100)
            .mount(&server)
            .await;

        let err = forge(&server).list_releases().await.unwrap_err();
        assert!(matches!(err, ForgeError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn create_sends_release_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(RELEASES))
            .and(header("authorization", "token abc123"))
            .and(body_json(json!({
                "tag_name": "v1.0.0",
                "name": "First",
                "body": "notes",
                "draft": true,
                "prerelease": false
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 9,
                "tag_name": "v1.0.0",
                "name": "First",
                "body": "notes",
                "draft": true,
                "prerelease": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        let release = forge(&server)
            .create_release(CreateReleaseRequest {
                tag_name: "v1.0.0".into(),
                title: "First".into(),
                note: "notes".into(),
                draft: true,
                prerelease: false,
            })
            .await
            .unwrap();

        assert_eq!(release.id, 9);
        assert_eq!(release.title, "First");
        assert!(release.draft);
        assert!(release.url.is_none());
    }

    #[tokio::test]
    async fn edit_patches_release_by_id() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path(format!("{}/4", RELEASES)))
            .and(body_json(json!({
                "tag_name": "v2.0.0",
                "name": "Second",
                "body": "",
                "draft": false,
                "prerelease": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 4,
                "tag_name": "v2.0.0",
                "name": "Second",
                "prerelease": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let release = forge(&server)
            .edit_release(EditReleaseRequest {
                id: 4,
                tag_name: "v2.0.0".into(),
                title: "Second".into(),
                note: String::new(),
                draft: false,
                prerelease: true,
            })
            .await
            .unwrap();

        assert_eq!(release.id, 4);
        assert!(release.prerelease);
        assert_eq!(release.note, "");
    }
}

mod attachments {
    use super::*;

    #[tokio::test]
    async fn list_maps_fields() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("{}/7/assets", RELEASES)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": 31,
                "name": "app.tar.gz",
                "size": 2048,
                "browser_download_url": "https://gitea.example.com/attachments/31"
            }])))
            .expect(1)
            .mount(&server)
            .await;

        let attachments = forge(&server).list_attachments(7).await.unwrap();

        assert_eq!(attachments.len(), 1);
        assert_eq!(attachments[0].id, 31);
        assert_eq!(attachments[0].name, "app.tar.gz");
        assert_eq!(attachments[0].size, 2048);
        assert_eq!(
            attachments[0].download_url.as_deref(),
            Some("https://gitea.example.com/attachments/31")
        );
    }

    #[tokio::test]
    async fn upload_is_multipart_with_name_query() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(format!("{}/7/assets", RELEASES)))
            .and(query_param("name", "app.tar.gz"))
            .and(header("authorization", "token abc123"))
            .and(body_string_contains("name=\"attachment\""))
            .and(body_string_contains("filename=\"app.tar.gz\""))
            .and(body_string_contains("artifact-bytes"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 40,
                "name": "app.tar.gz",
                "size": 14
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let file = dir.path().join("app.tar.gz");
        fs::write(&file, b"artifact-bytes").unwrap();
        let upload = AttachmentUpload::open("app.tar.gz", &file).await.unwrap();

        let attachment = forge(&server).create_attachment(7, upload).await.unwrap();

        assert_eq!(attachment.id, 40);
        assert_eq!(attachment.size, 14);
    }

    #[tokio::test]
    async fn upload_streams_whole_file() {
        let server = MockServer::start().await;

        // Larger than any single read buffer, with a marker at the very end.
        let mut contents = vec![b'x'; 256 * 1024];
        contents.extend_from_slice(b"END-OF-ARTIFACT");
        let len = contents.len();

        Mock::given(method("POST"))
            .and(path(format!("{}/7/assets", RELEASES)))
            .and(body_string_contains("END-OF-ARTIFACT"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 41,
                "name": "big.bin",
                "size": len
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let file = dir.path().join("big.bin");
        fs::write(&file, &contents).unwrap();
        let upload = AttachmentUpload::open("big.bin", &file).await.unwrap();
        assert_eq!(upload.size, len as u64);

        let attachment = forge(&server).create_attachment(7, upload).await.unwrap();
        assert_eq!(attachment.size, len as u64);
    }

    #[tokio::test]
    async fn delete_accepts_no_content() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path(format!("{}/7/assets/31", RELEASES)))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        forge(&server).delete_attachment(7, 31).await.unwrap();
    }
}

mod errors {
    use super::*;

    async fn list_with_status(status: u16, body: serde_json::Value) -> ForgeError {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(RELEASES))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&server)
            .await;

        forge(&server).list_releases().await.unwrap_err()
    }

    #[tokio::test]
    async fn unauthorized_is_auth_failed() {
        let err = list_with_status(401, json!({"message": "token is required"})).await;
        assert!(matches!(err, ForgeError::AuthFailed(_)));
    }

    #[tokio::test]
    async fn not_found_carries_server_message() {
        let err = list_with_status(404, json!({"message": "repo does not exist"})).await;
        match err {
            ForgeError::NotFound(msg) => assert_eq!(msg, "repo does not exist"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn server_error_keeps_status() {
        let err = list_with_status(500, json!({"message": "boom"})).await;
        match err {
            ForgeError::ApiError { status, message } => {
                assert_eq!(status, 500);
                assert!(message.contains("boom"));
            }
            other => panic!("expected ApiError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn conflict_is_api_error() {
        let err = list_with_status(409, json!({"message": "release with this tag already exists"}))
            .await;
        assert!(matches!(err, ForgeError::ApiError { status: 409, .. }));
    }
}
