//! Drives the generated wrappers through an in-memory translation service.
use std::{
    collections::HashMap,
    convert::Infallible,
    sync::{Arc, Mutex},
};

use motranslation::{
    ClientConfig, HttpReply, Method, MoTranslationClient, RpcError, RpcHttpClient,
    serde_json::{self, Value, json},
};

/// Answers a few lookups from fixed tables; unknown methods get a 500 with an error member.
#[derive(Clone, Default)]
struct FakeTranslationService {
    seen: Arc<Mutex<Vec<(String, Vec<Value>)>>>,
}

impl FakeTranslationService {
    fn dispatch(&self, method: &str, params: &[Value]) -> HttpReply {
        let fid_to_locus: HashMap<&str, i64> =
            HashMap::from([("kb|g.0.peg.1", 7001), ("kb|g.0.peg.2", 7002)]);
        let result = match method {
            "MOTranslation.fids_to_moLocusIds" => {
                let mut mapping = serde_json::Map::new();
                for fid in params[0].as_array().into_iter().flatten() {
                    if let Some(locus) = fid.as_str().and_then(|fid| fid_to_locus.get(fid)) {
                        mapping.insert(fid.as_str().unwrap_or_default().into(), json!([locus]));
                    }
                }
                json!([mapping])
            }
            "MOTranslation.moTaxonomyId_to_genomes" => json!([["kb|g.0", "kb|g.371"]]),
            "MOTranslation.map_to_fid" => json!([{"q1": "kb|g.0.peg.1"}, "1 of 1 mapped"]),
            _ => {
                return HttpReply::new(
                    500,
                    json!({"version": "1.1", "error": {"message": format!("no method {method}")}})
                        .to_string(),
                );
            }
        };
        HttpReply::new(200, json!({"version": "1.1", "result": result}).to_string())
    }
}

impl RpcHttpClient for FakeTranslationService {
    type Error = Infallible;

    async fn post_envelope(
        &self,
        _uri: Arc<str>,
        body: String,
        _auth_header: Option<String>,
    ) -> Result<HttpReply, Self::Error> {
        let request: Value = serde_json::from_str(&body).unwrap_or_default();
        let method = request["method"].as_str().unwrap_or_default().to_string();
        let params = request["params"].as_array().cloned().unwrap_or_default();
        let reply = self.dispatch(&method, &params);
        self.seen.lock().unwrap().push((method, params));
        Ok(reply)
    }
}

fn client() -> (MoTranslationClient<FakeTranslationService>, FakeTranslationService) {
    let service = FakeTranslationService::default();
    let client = MoTranslationClient::with_client(
        service.clone(),
        ClientConfig::with_url("http://translation.invalid"),
    );
    (client, service)
}

#[tokio::test]
async fn test_single_value_methods_unwrap() -> anyhow::Result<()> {
    let (client, _) = client();
    let mapping = client
        .fids_to_mo_locus_ids(vec!["kb|g.0.peg.1", "kb|g.0.peg.9"])
        .await?;
    assert_eq!(mapping, json!({"kb|g.0.peg.1": [7001]}));

    let genomes = client.mo_taxonomy_id_to_genomes(83333).await?;
    assert_eq!(genomes, json!(["kb|g.0", "kb|g.371"]));
    Ok(())
}

#[tokio::test]
async fn test_two_value_method_keeps_list() -> anyhow::Result<()> {
    let (client, service) = client();
    let result = client
        .map_to_fid(json!([{"id": "q1", "seq": "MKV"}]), "kb|g.0")
        .await?;
    assert_eq!(result, json!([{"q1": "kb|g.0.peg.1"}, "1 of 1 mapped"]));
    let seen = service.seen.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![(
            "MOTranslation.map_to_fid".to_string(),
            vec![json!([{"id": "q1", "seq": "MKV"}]), json!("kb|g.0")]
        )]
    );
    Ok(())
}

#[tokio::test]
async fn test_every_table_entry_reaches_service_under_its_rpc_name() {
    let (client, service) = client();
    for method in Method::ALL {
        let params = (0..method.arity()).map(|i| json!(i)).collect();
        let _ = client.call(*method, params, Default::default()).await;
    }
    let seen = service.seen.lock().unwrap().clone();
    assert_eq!(seen.len(), Method::ALL.len());
    for (method, (name, params)) in Method::ALL.iter().zip(seen) {
        assert_eq!(name, method.rpc_name());
        assert_eq!(params.len(), method.arity());
    }
}

#[tokio::test]
async fn test_unimplemented_method_reports_error_member() {
    let (client, _) = client();
    match client.proteins_to_mo_locus_ids(vec!["md5"]).await {
        Err(RpcError::ServerError {
            status,
            error,
            http_status,
        }) => {
            assert_eq!(status, 500);
            assert_eq!(http_status, Some(500));
            assert_eq!(
                error["message"],
                "no method MOTranslation.proteins_to_moLocusIds"
            );
        }
        other => panic!("Expected ServerError, got {other:?}"),
    }
}

#[tokio::test]
#[allow(deprecated)]
async fn test_deprecated_alias_matches_plain_method() -> anyhow::Result<()> {
    let (client, _) = client();
    let plain = client.mo_taxonomy_id_to_genomes(83333).await?;
    let alias = client.mo_taxonomy_id_to_genomes_async(83333).await?;
    assert_eq!(plain, alias);
    assert!(client.deprecation_warning_sent());
    Ok(())
}
