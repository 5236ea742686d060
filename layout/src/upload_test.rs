use base64::Engine as _;

use super::*;

const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

#[test]
fn sniffs_known_formats() {
    assert_eq!(sniff_image_type(PNG_HEADER), Some("image/png"));
    assert_eq!(sniff_image_type(&[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10]), Some("image/jpeg"));
    assert_eq!(sniff_image_type(b"GIF89a\x01\0\x01\0"), Some("image/gif"));
    assert_eq!(sniff_image_type(b"RIFF\x24\0\0\0WEBPVP8 "), Some("image/webp"));
    assert_eq!(sniff_image_type(b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>"), Some("image/svg+xml"));
    assert_eq!(
        sniff_image_type(b"  <?xml version=\"1.0\"?>\n<svg xmlns=\"http://www.w3.org/2000/svg\"/>"),
        Some("image/svg+xml")
    );
}

#[test]
fn rejects_unknown_bytes() {
    assert_eq!(sniff_image_type(b"%PDF-1.7"), None);
    assert_eq!(sniff_image_type(b"<?xml version=\"1.0\"?><html/>"), None);
    assert_eq!(sniff_image_type(b"RIFF\0\0\0\0WAVE"), None);
    assert!(matches!(image_data_uri(b"hello"), Err(UploadError::UnsupportedType)));
}

#[test]
fn encodes_data_uri() {
    let uri = image_data_uri(PNG_HEADER).unwrap();
    assert!(uri.starts_with("data:image/png;base64,"));
    let payload = uri.trim_start_matches("data:image/png;base64,");
    assert_eq!(STANDARD.decode(payload).unwrap(), PNG_HEADER);
}

#[test]
fn empty_is_rejected() {
    assert!(matches!(image_data_uri(&[]), Err(UploadError::Empty)));
}

#[test]
fn size_limit_is_enforced() {
    let result = image_data_uri_with_limit(PNG_HEADER, 8);
    assert!(matches!(result, Err(UploadError::TooLarge { size: 16, max: 8 })));
    assert!(image_data_uri_with_limit(PNG_HEADER, PNG_HEADER.len()).is_ok());
}

#[tokio::test]
async fn reads_file_from_disk() {
    let path = std::env::temp_dir().join(format!("layout-upload-{}.png", uuid::Uuid::new_v4()));
    tokio::fs::write(&path, PNG_HEADER).await.unwrap();
    let uri = read_image_file(&path).await;
    tokio::fs::remove_file(&path).await.unwrap();
    assert!(uri.unwrap().starts_with("data:image/png;base64,"));
}

#[tokio::test]
async fn missing_file_is_io_error() {
    let path = std::env::temp_dir().join(format!("layout-missing-{}.png", uuid::Uuid::new_v4()));
    assert!(matches!(read_image_file(&path).await, Err(UploadError::Io(_))));
}
