//! Servicio de fotos de inspección
//!
//! Decodifica imágenes base64 y las sube a un media host externo con la API
//! de upload sin firma (estilo Cloudinary).

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::Deserialize;

use crate::config::MediaConfig;
use crate::models::foto::CONTENT_TYPES_PERMITIDOS;
use crate::utils::errors::AppError;

/// Resultado de una subida exitosa
#[derive(Debug, Clone, PartialEq)]
pub struct FotoSubida {
    pub url: String,
    pub public_id: Option<String>,
}

/// Imagen decodificada y validada
#[derive(Debug, Clone)]
pub struct ImagenDecodificada {
    pub datos: Vec<u8>,
    pub content_type: String,
}

#[async_trait]
pub trait MediaHost: Send + Sync {
    async fn subir(&self, imagen: &ImagenDecodificada, carpeta: &str) -> Result<FotoSubida, AppError>;
}

/// Media host HTTP (upload sin firma con `upload_preset`)
pub struct HttpMediaHost {
    client: Client,
    config: MediaConfig,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    url: Option<String>,
    public_id: Option<String>,
}

impl HttpMediaHost {
    pub fn new(client: Client, config: MediaConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl MediaHost for HttpMediaHost {
    async fn subir(&self, imagen: &ImagenDecodificada, carpeta: &str) -> Result<FotoSubida, AppError> {
        let data_uri = format!(
            "data:{};base64,{}",
            imagen.content_type,
            STANDARD.encode(&imagen.datos)
        );
        let folder = format!("{}/{}", self.config.folder, carpeta);
        let form = [
            ("file", data_uri.as_str()),
            ("upload_preset", self.config.upload_preset.as_str()),
            ("folder", folder.as_str()),
        ];

        let response = self
            .client
            .post(&self.config.upload_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("error enviando foto: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "media host respondió {}: {}",
                status, body
            )));
        }

        let upload: UploadResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("respuesta de media host inválida: {}", e)))?;

        let url = upload
            .secure_url
            .or(upload.url)
            .ok_or_else(|| AppError::ExternalApi("media host no devolvió URL".to_string()))?;

        tracing::info!(url = %url, bytes = imagen.datos.len(), "📸 foto subida al media host");
        Ok(FotoSubida {
            url,
            public_id: upload.public_id,
        })
    }
}

/// Decodificar una imagen en base64 (acepta data URI) y validar tipo y tamaño
pub fn decodificar_imagen(
    imagen_base64: &str,
    content_type: Option<&str>,
    max_bytes: usize,
) -> Result<ImagenDecodificada, AppError> {
    let (tipo_data_uri, payload) = match imagen_base64.strip_prefix("data:") {
        Some(rest) => {
            let (meta, payload) = rest
                .split_once(',')
                .ok_or_else(|| AppError::BadRequest("Data URI inválida".to_string()))?;
            let tipo = meta
                .strip_suffix(";base64")
                .ok_or_else(|| AppError::BadRequest("La data URI debe ser base64".to_string()))?;
            (Some(tipo), payload)
        }
        None => (None, imagen_base64),
    };

    let content_type = tipo_data_uri
        .or(content_type)
        .ok_or_else(|| AppError::BadRequest("content_type es requerido".to_string()))?
        .to_lowercase();

    if !CONTENT_TYPES_PERMITIDOS.contains(&content_type.as_str()) {
        return Err(AppError::BadRequest(format!(
            "Tipo de imagen no permitido: {}",
            content_type
        )));
    }

    // 4 caracteres base64 = 3 bytes; evita decodificar payloads enormes
    if payload.len() / 4 * 3 > max_bytes + 3 {
        return Err(AppError::PayloadTooLarge(format!(
            "La foto supera el máximo de {} bytes",
            max_bytes
        )));
    }

    let datos = STANDARD
        .decode(payload.trim())
        .map_err(|_| AppError::BadRequest("Imagen base64 inválida".to_string()))?;

    if datos.is_empty() {
        return Err(AppError::BadRequest("La imagen está vacía".to_string()));
    }
    if datos.len() > max_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "La foto supera el máximo de {} bytes",
            max_bytes
        )));
    }

    Ok(ImagenDecodificada {
        datos,
        content_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodificar_data_uri() {
        let imagen = decodificar_imagen("data:image/png;base64,iVBORw0KGgo=", None, 1024).unwrap();
        assert_eq!(imagen.content_type, "image/png");
        assert_eq!(&imagen.datos[1..4], b"PNG");
    }

    #[test]
    fn test_decodificar_base64_plano_con_content_type() {
        let imagen = decodificar_imagen("/9j/4AAQ", Some("IMAGE/JPEG"), 1024).unwrap();
        assert_eq!(imagen.content_type, "image/jpeg");
        assert_eq!(imagen.datos[0], 0xFF);
    }

    #[test]
    fn test_rechaza_tipo_no_permitido() {
        let err = decodificar_imagen("R0lGODlh", Some("image/gif"), 1024).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_rechaza_sin_content_type() {
        assert!(decodificar_imagen("R0lGODlh", None, 1024).is_err());
    }

    #[test]
    fn test_rechaza_base64_invalido() {
        let err = decodificar_imagen("no es base64!!", Some("image/png"), 1024).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_rechaza_foto_muy_grande() {
        let grande = STANDARD.encode(vec![0u8; 2048]);
        let err = decodificar_imagen(&grande, Some("image/png"), 1024).unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));
    }
}
