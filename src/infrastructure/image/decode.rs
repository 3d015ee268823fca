//! Image decoding off the async runtime.

use bytes::Bytes;

use crate::domain::errors::LoadError;

/// Decodes an encoded image body on a blocking thread.
///
/// The format is sniffed from the bytes; the response content type is not
/// consulted.
///
/// # Errors
/// Returns [`LoadError::Decode`] if the bytes are not a supported image.
pub async fn decode_image(bytes: Bytes) -> Result<image::DynamicImage, LoadError> {
    if bytes.is_empty() {
        return Err(LoadError::decode("empty body"));
    }

    tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
        .await
        .map_err(|e| LoadError::decode(format!("decode task panicked: {e}")))?
        .map_err(|e| LoadError::decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::image::test_support::png_bytes;

    #[tokio::test]
    async fn test_decode_png() -> Result<(), LoadError> {
        let img = decode_image(Bytes::from(png_bytes(3, 2))).await?;
        assert_eq!((img.width(), img.height()), (3, 2));
        Ok(())
    }

    #[tokio::test]
    async fn test_decode_rejects_non_image() {
        let err = tokio_test::assert_err!(
            decode_image(Bytes::from_static(b"<html>not found</html>")).await
        );
        assert!(matches!(err, LoadError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_decode_rejects_empty_body() {
        let result = decode_image(Bytes::new()).await;
        assert_eq!(result.err(), Some(LoadError::decode("empty body")));
    }
}
