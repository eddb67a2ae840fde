//! Concrete translation backends. Each is grounded in the corresponding
//! class in `original_source/lib/translators.py`: DeepL and Google and
//! Microsoft batch the whole request in one call, while LibreTranslate,
//! MyMemory, and Lingva only expose a single-string endpoint and are
//! translated one request per entry, exactly as the Python
//! `BaseTranslator.translate_batch` default does.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use super::{map_reqwest_err, map_status, retry_after_secs, shape_check, ProviderConfig, TranslationBackend};
use crate::error::BackendFailure;

fn client_for(config: &ProviderConfig) -> Client {
    Client::builder()
        .timeout(Duration::from_millis(config.timeout_ms))
        .build()
        .unwrap_or_else(|_| Client::new())
}

pub struct DeepLBackend {
    client: Client,
    config: ProviderConfig,
    base_url: String,
}

impl DeepLBackend {
    pub fn new(config: ProviderConfig, free: bool) -> Self {
        let base_url = config.endpoint_url.clone().unwrap_or_else(|| {
            if free {
                "https://api-free.deepl.com/v2".to_string()
            } else {
                "https://api.deepl.com/v2".to_string()
            }
        });
        Self { client: client_for(&config), config, base_url }
    }

    fn map_language(lang: &str) -> String {
        let lower = lang.to_ascii_lowercase();
        let mapped = match lower.as_str() {
            "en" => "EN", "sv" => "SV", "de" => "DE", "fr" => "FR", "es" => "ES", "it" => "IT",
            "nl" => "NL", "pl" => "PL", "pt" => "PT-PT", "ru" => "RU", "ja" => "JA", "zh" => "ZH",
            "da" => "DA", "fi" => "FI", "no" => "NB", "ko" => "KO",
            _ => return lang.to_ascii_uppercase(),
        };
        mapped.to_string()
    }

    const FORMALITY_ELIGIBLE: &'static [&'static str] =
        &["DE", "FR", "IT", "ES", "NL", "PL", "PT-PT", "PT-BR", "RU"];
}

#[async_trait]
impl TranslationBackend for DeepLBackend {
    fn name(&self) -> &str {
        "deepl"
    }

    async fn translate_batch(
        &self,
        texts: &[String],
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Vec<String>, BackendFailure> {
        let api_key = self.config.api_key.as_deref().ok_or(BackendFailure::AuthMissing)?;
        let target = Self::map_language(target_lang);
        let mut body = json!({ "text": texts, "target_lang": target });
        if source_lang != "auto" {
            body["source_lang"] = json!(Self::map_language(source_lang));
        }
        if let Some(formality) = &self.config.formality {
            if formality != "default" && Self::FORMALITY_ELIGIBLE.contains(&target.as_str()) {
                body["formality"] = json!(formality);
            }
        }

        let resp = self
            .client
            .post(format!("{}/translate", self.base_url))
            .header("Authorization", format!("DeepL-Auth-Key {api_key}"))
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_err)?;

        if !resp.status().is_success() {
            let status = resp.status();
            let retry_after = retry_after_secs(resp.headers());
            let text = resp.text().await.unwrap_or_default();
            return Err(map_status(status, retry_after, text));
        }

        let parsed: Value = resp.json().await.map_err(map_reqwest_err)?;
        let translations: Vec<String> = parsed["translations"]
            .as_array()
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter_map(|t| t["text"].as_str().map(str::to_string))
            .collect();
        shape_check(texts, &translations)?;
        Ok(translations)
    }
}

pub struct LibreTranslateBackend {
    client: Client,
    config: ProviderConfig,
    base_url: String,
}

impl LibreTranslateBackend {
    pub fn new(config: ProviderConfig) -> Self {
        let base_url = config
            .endpoint_url
            .clone()
            .unwrap_or_else(|| "https://libretranslate.com".to_string())
            .trim_end_matches('/')
            .to_string();
        Self { client: client_for(&config), config, base_url }
    }
}

#[async_trait]
impl TranslationBackend for LibreTranslateBackend {
    fn name(&self) -> &str {
        "libretranslate"
    }

    async fn translate_batch(
        &self,
        texts: &[String],
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Vec<String>, BackendFailure> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            let mut body = json!({
                "q": text,
                "source": source_lang,
                "target": target_lang,
                "format": "text",
            });
            if let Some(key) = &self.config.api_key {
                body["api_key"] = json!(key);
            }
            let resp = self
                .client
                .post(format!("{}/translate", self.base_url))
                .json(&body)
                .send()
                .await
                .map_err(map_reqwest_err)?;
            if !resp.status().is_success() {
                let status = resp.status();
                let retry_after = retry_after_secs(resp.headers());
                let t = resp.text().await.unwrap_or_default();
                return Err(map_status(status, retry_after, t));
            }
            let parsed: Value = resp.json().await.map_err(map_reqwest_err)?;
            let translated = parsed["translatedText"].as_str().unwrap_or(text).to_string();
            out.push(translated);
        }
        shape_check(texts, &out)?;
        Ok(out)
    }
}

pub struct MyMemoryBackend {
    client: Client,
    config: ProviderConfig,
}

impl MyMemoryBackend {
    pub fn new(config: ProviderConfig) -> Self {
        Self { client: client_for(&config), config }
    }
}

#[async_trait]
impl TranslationBackend for MyMemoryBackend {
    fn name(&self) -> &str {
        "mymemory"
    }

    async fn translate_batch(
        &self,
        texts: &[String],
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Vec<String>, BackendFailure> {
        let base_url = self
            .config
            .endpoint_url
            .clone()
            .unwrap_or_else(|| "https://api.mymemory.translated.net".to_string());
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            let mut query = vec![
                ("q".to_string(), text.clone()),
                ("langpair".to_string(), format!("{source_lang}|{target_lang}")),
            ];
            if let Some(email) = &self.config.api_key {
                query.push(("de".to_string(), email.clone()));
            }
            let resp = self
                .client
                .get(format!("{base_url}/get"))
                .query(&query)
                .send()
                .await
                .map_err(map_reqwest_err)?;
            if !resp.status().is_success() {
                let status = resp.status();
                let retry_after = retry_after_secs(resp.headers());
                let t = resp.text().await.unwrap_or_default();
                return Err(map_status(status, retry_after, t));
            }
            let parsed: Value = resp.json().await.map_err(map_reqwest_err)?;
            let translated = parsed["responseData"]["translatedText"]
                .as_str()
                .unwrap_or(text)
                .to_string();
            out.push(translated);
        }
        shape_check(texts, &out)?;
        Ok(out)
    }
}

pub struct GoogleBackend {
    client: Client,
    config: ProviderConfig,
    base_url: String,
}

impl GoogleBackend {
    pub fn new(config: ProviderConfig) -> Self {
        let base_url = config
            .endpoint_url
            .clone()
            .unwrap_or_else(|| "https://translation.googleapis.com/language/translate/v2".to_string());
        Self { client: client_for(&config), config, base_url }
    }
}

#[async_trait]
impl TranslationBackend for GoogleBackend {
    fn name(&self) -> &str {
        "google"
    }

    async fn translate_batch(
        &self,
        texts: &[String],
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Vec<String>, BackendFailure> {
        let api_key = self.config.api_key.as_deref().ok_or(BackendFailure::AuthMissing)?;
        let mut body = json!({
            "q": texts,
            "target": target_lang,
            "format": "text",
            "key": api_key,
        });
        if source_lang != "auto" {
            body["source"] = json!(source_lang);
        }

        let resp = self.client.post(&self.base_url).json(&body).send().await.map_err(map_reqwest_err)?;
        if !resp.status().is_success() {
            let status = resp.status();
            let retry_after = retry_after_secs(resp.headers());
            let t = resp.text().await.unwrap_or_default();
            return Err(map_status(status, retry_after, t));
        }
        let parsed: Value = resp.json().await.map_err(map_reqwest_err)?;
        let translations: Vec<String> = parsed["data"]["translations"]
            .as_array()
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter_map(|t| t["translatedText"].as_str().map(str::to_string))
            .collect();
        shape_check(texts, &translations)?;
        Ok(translations)
    }
}

pub struct MicrosoftBackend {
    client: Client,
    config: ProviderConfig,
    base_url: String,
}

impl MicrosoftBackend {
    pub fn new(config: ProviderConfig) -> Self {
        let base_url = config
            .endpoint_url
            .clone()
            .unwrap_or_else(|| "https://api.cognitive.microsofttranslator.com/translate".to_string());
        Self { client: client_for(&config), config, base_url }
    }
}

#[async_trait]
impl TranslationBackend for MicrosoftBackend {
    fn name(&self) -> &str {
        "microsoft"
    }

    async fn translate_batch(
        &self,
        texts: &[String],
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Vec<String>, BackendFailure> {
        let api_key = self.config.api_key.as_deref().ok_or(BackendFailure::AuthMissing)?;
        let region = self.config.region.as_deref().unwrap_or("westeurope");

        let mut query = vec![("api-version".to_string(), "3.0".to_string()), ("to".to_string(), target_lang.to_string())];
        if source_lang != "auto" {
            query.push(("from".to_string(), source_lang.to_string()));
        }

        let body: Vec<Value> = texts.iter().map(|t| json!({ "Text": t })).collect();

        let resp = self
            .client
            .post(&self.base_url)
            .query(&query)
            .header("Ocp-Apim-Subscription-Key", api_key)
            .header("Ocp-Apim-Subscription-Region", region)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_err)?;

        if !resp.status().is_success() {
            let status = resp.status();
            let retry_after = retry_after_secs(resp.headers());
            let t = resp.text().await.unwrap_or_default();
            return Err(map_status(status, retry_after, t));
        }
        let parsed: Value = resp.json().await.map_err(map_reqwest_err)?;
        let translations: Vec<String> = parsed
            .as_array()
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter_map(|r| r["translations"][0]["text"].as_str().map(str::to_string))
            .collect();
        shape_check(texts, &translations)?;
        Ok(translations)
    }
}

pub struct LingvaBackend {
    client: Client,
    base_url: String,
}

impl LingvaBackend {
    pub fn new(config: ProviderConfig) -> Self {
        let base_url = config
            .endpoint_url
            .clone()
            .unwrap_or_else(|| "https://lingva.ml".to_string())
            .trim_end_matches('/')
            .to_string();
        Self { client: client_for(&config), base_url }
    }
}

#[async_trait]
impl TranslationBackend for LingvaBackend {
    fn name(&self) -> &str {
        "lingva"
    }

    async fn translate_batch(
        &self,
        texts: &[String],
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Vec<String>, BackendFailure> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            let encoded = urlencoding::encode(text);
            let url = format!("{}/api/v1/{}/{}/{}", self.base_url, source_lang, target_lang, encoded);
            let resp = self.client.get(&url).send().await.map_err(map_reqwest_err)?;
            if !resp.status().is_success() {
                let status = resp.status();
                let retry_after = retry_after_secs(resp.headers());
                let t = resp.text().await.unwrap_or_default();
                return Err(map_status(status, retry_after, t));
            }
            let parsed: Value = resp.json().await.map_err(map_reqwest_err)?;
            let translated = parsed["translation"].as_str().unwrap_or(text).to_string();
            out.push(translated);
        }
        shape_check(texts, &out)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deepl_language_mapping_known_codes() {
        assert_eq!(DeepLBackend::map_language("en"), "EN");
        assert_eq!(DeepLBackend::map_language("pt"), "PT-PT");
    }

    #[test]
    fn deepl_language_mapping_falls_back_to_uppercase() {
        assert_eq!(DeepLBackend::map_language("xx"), "XX");
    }

    #[test]
    fn escape_leaves_alnum_untouched_and_encodes_rest() {
        assert_eq!(urlencoding::encode("Hi there!"), "Hi%20there%21");
    }
}
