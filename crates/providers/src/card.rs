//! Business card rendering.
//!
//! The card is filled into an HTML template here and converted to PDF by an
//! external HTML-to-PDF service (a Gotenberg-style `multipart/form-data`
//! endpoint that takes an `index.html` file and returns the document).

use async_trait::async_trait;

use bob_core::generators::{CardInput, CardRenderer, GeneratorError, GeneratorResult};

use crate::error::{ensure_success, ProviderError};

const PROVIDER: &str = "pdf-render";

const CARD_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<link href="https://fonts.googleapis.com/css2?family={{headingFontUrl}}&family={{bodyFontUrl}}&display=swap" rel="stylesheet">
<style>
  @page { size: 3.5in 2in; margin: 0; }
  html, body { margin: 0; width: 3.5in; height: 2in; }
  body { background: {{backgroundColor}}; color: {{textColor}}; font-family: '{{bodyFont}}', sans-serif; }
  .card { display: flex; align-items: center; height: 100%; padding: 0 0.25in; box-sizing: border-box; gap: 0.2in; }
  .logo { width: 0.9in; height: 0.9in; }
  .name { font-family: '{{headingFont}}', sans-serif; font-size: 14pt; font-weight: 700; }
  .meta { font-size: 8pt; color: {{secondaryColor}}; margin-top: 4pt; }
  .rule { border-left: 2px solid {{accentColor}}; height: 1in; }
</style>
</head>
<body>
  <div class="card">
    <div class="logo"><img src="{{logoUrl}}" alt="Logo" style="width: 100%; height: 100%; object-fit: contain;"></div>
    <div class="rule"></div>
    <div>
      <div class="name">{{userName}}</div>
      <div class="meta">{{userEmail}}</div>
      <div class="meta">{{domainName}}</div>
    </div>
  </div>
</body>
</html>
"#;

/// Escape text for inclusion in HTML content or a quoted attribute.
fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Fill the card template.
pub fn render_card_html(input: &CardInput) -> String {
    let font_url = |name: &str| name.trim().replace(' ', "+");
    [
        ("{{headingFontUrl}}", font_url(&input.fonts.heading)),
        ("{{bodyFontUrl}}", font_url(&input.fonts.body)),
        ("{{backgroundColor}}", input.palette.light.clone()),
        ("{{textColor}}", input.palette.dark.clone()),
        ("{{secondaryColor}}", input.palette.secondary.clone()),
        ("{{accentColor}}", input.palette.accent.clone()),
        ("{{headingFont}}", escape_html(&input.fonts.heading)),
        ("{{bodyFont}}", escape_html(&input.fonts.body)),
        ("{{logoUrl}}", escape_html(input.logo_ref.as_str())),
        ("{{userName}}", escape_html(&input.display_name)),
        ("{{userEmail}}", escape_html(&input.email)),
        ("{{domainName}}", escape_html(&input.domain_name)),
    ]
    .iter()
    .fold(CARD_TEMPLATE.to_string(), |html, (placeholder, value)| {
        html.replace(*placeholder, value)
    })
}

/// Posts the filled template to an HTML-to-PDF service.
pub struct HttpCardRenderer {
    client: reqwest::Client,
    render_url: Option<String>,
}

impl HttpCardRenderer {
    pub fn new(client: reqwest::Client, render_url: Option<String>) -> Self {
        Self { client, render_url }
    }
}

#[async_trait]
impl CardRenderer for HttpCardRenderer {
    async fn render_card(&self, input: &CardInput) -> GeneratorResult<Vec<u8>> {
        let Some(url) = &self.render_url else {
            return Err(GeneratorError::Request(
                "no business card renderer is configured".to_string(),
            ));
        };

        let html = render_card_html(input);
        let part = reqwest::multipart::Part::bytes(html.into_bytes())
            .file_name("index.html")
            .mime_str("text/html")
            .map_err(ProviderError::from)?;
        let form = reqwest::multipart::Form::new()
            .part("files", part)
            .text("paperWidth", "3.5")
            .text("paperHeight", "2")
            .text("marginTop", "0")
            .text("marginBottom", "0")
            .text("marginLeft", "0")
            .text("marginRight", "0")
            .text("printBackground", "true");

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(ProviderError::from)?;
        let response = ensure_success(PROVIDER, response).await?;
        let bytes = response.bytes().await.map_err(ProviderError::from)?;
        if bytes.is_empty() {
            return Err(ProviderError::malformed(PROVIDER, "empty document").into());
        }
        Ok(bytes.to_vec())
    }
}
