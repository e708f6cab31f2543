use crate::{
    error::JwtError,
    jwt::RawPayload,
    tests::fixtures::{
        daneel_key, short_key, tools_at, BrokenSigner, DANEEL_TIME, DANEEL_TOKEN, ES256K_HEADER,
        HELLO_WORLD_TOKEN, SHORT_KEY_DID,
    },
    tools::DEFAULT_JWT_VALIDITY_SECONDS,
};
use serde_json::{json, Value};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

#[cfg(target_arch = "wasm32")]
wasm_bindgen_test_configure!(run_in_browser);

fn claims(value: Value) -> RawPayload {
    match value {
        Value::Object(map) => map,
        other => panic!("Expected an object, got {other}"),
    }
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
async fn it_creates_the_same_es256k_token_as_other_implementations() {
    let (tools, _) = tools_at(1);

    let token = tools
        .create_jwt(
            claims(json!({ "hello": "world" })),
            SHORT_KEY_DID,
            &short_key(),
            -1,
            "ES256K",
        )
        .await
        .unwrap();

    assert_eq!(token, HELLO_WORLD_TOKEN);
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
async fn it_creates_the_same_es256k_r_token_as_other_implementations() {
    let (tools, _) = tools_at(DANEEL_TIME);
    let signer = daneel_key();

    let token = tools
        .create_jwt(
            claims(json!({ "claims": { "name": "R Daneel Olivaw" } })),
            &signer.did(),
            &signer,
            DEFAULT_JWT_VALIDITY_SECONDS,
            "ES256K-R",
        )
        .await
        .unwrap();

    assert_eq!(token, DANEEL_TOKEN);
    assert_eq!(tools.decode(&token).unwrap().signature.len(), 65);
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
async fn it_produces_identical_tokens_for_identical_inputs() {
    let (tools, _) = tools_at(1000);
    let signer = short_key();

    let mut tokens = Vec::new();
    for _ in 0..2 {
        tokens.push(
            tools
                .create_jwt(
                    claims(json!({ "a": 1, "b": [true, null] })),
                    SHORT_KEY_DID,
                    &signer,
                    60,
                    "ES256K-R",
                )
                .await
                .unwrap(),
        );
    }

    assert_eq!(tokens[0], tokens[1]);
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
async fn it_appends_registered_claims_after_the_callers_claims() {
    let (tools, _) = tools_at(1000);

    let token = tools
        .create_jwt(
            claims(json!({ "zeta": 1, "alpha": 2 })),
            SHORT_KEY_DID,
            &short_key(),
            60,
            "ES256K",
        )
        .await
        .unwrap();

    assert!(token.starts_with(ES256K_HEADER));

    let payload = tools.decode_raw(&token).unwrap().payload;
    let keys: Vec<&str> = payload.keys().map(|key| key.as_str()).collect();

    assert_eq!(keys, vec!["zeta", "alpha", "iat", "exp", "iss"]);
    assert_eq!(payload.get("iat"), Some(&json!(1000)));
    assert_eq!(payload.get("exp"), Some(&json!(1060)));
    assert_eq!(payload.get("iss"), Some(&json!(SHORT_KEY_DID)));
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
async fn it_keeps_registered_claims_the_caller_supplied_and_bases_exp_on_the_clock() {
    let (tools, _) = tools_at(5000);

    let token = tools
        .create_jwt(
            claims(json!({ "iss": "did:web:example.com", "iat": 1000 })),
            SHORT_KEY_DID,
            &short_key(),
            300,
            "ES256K",
        )
        .await
        .unwrap();

    let payload = tools.decode(&token).unwrap().payload;

    assert_eq!(payload.iss, "did:web:example.com");
    assert_eq!(payload.iat, Some(1000));
    assert_eq!(payload.exp, Some(5300));
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
async fn it_leaves_out_registered_claims_set_to_null() {
    let (tools, _) = tools_at(5000);
    let signer = short_key();

    let without_iat = tools
        .create_jwt(
            claims(json!({ "iat": null })),
            SHORT_KEY_DID,
            &signer,
            300,
            "ES256K",
        )
        .await
        .unwrap();
    let payload = tools.decode_raw(&without_iat).unwrap().payload;
    assert!(!payload.contains_key("iat"));
    assert_eq!(payload.get("exp"), Some(&json!(5300)));

    let without_exp = tools
        .create_jwt(
            claims(json!({ "exp": null })),
            SHORT_KEY_DID,
            &signer,
            300,
            "ES256K",
        )
        .await
        .unwrap();
    let payload = tools.decode_raw(&without_exp).unwrap().payload;
    assert!(!payload.contains_key("exp"));
    assert_eq!(payload.get("iat"), Some(&json!(5000)));

    let without_iss = tools
        .create_jwt(
            claims(json!({ "iss": null })),
            SHORT_KEY_DID,
            &signer,
            300,
            "ES256K",
        )
        .await
        .unwrap();
    let payload = tools.decode_raw(&without_iss).unwrap().payload;
    assert!(!payload.contains_key("iss"));
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
async fn it_omits_exp_for_negative_lifetimes_even_if_the_caller_set_one() {
    let (tools, _) = tools_at(5000);

    let token = tools
        .create_jwt(
            claims(json!({ "exp": 9999 })),
            SHORT_KEY_DID,
            &short_key(),
            -1,
            "ES256K",
        )
        .await
        .unwrap();

    assert_eq!(tools.decode(&token).unwrap().payload.exp, None);
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
async fn it_refuses_algorithms_it_does_not_support() {
    let (tools, _) = tools_at(5000);

    for algorithm in ["HS256", "EdDSA", "es256k", ""] {
        let result = tools
            .create_jwt(
                RawPayload::new(),
                SHORT_KEY_DID,
                &short_key(),
                300,
                algorithm,
            )
            .await;

        assert!(
            matches!(&result, Err(JwtError::UnsupportedAlgorithm(alg)) if alg == algorithm),
            "Expected {algorithm:?} to be unsupported, got {result:?}"
        );
    }
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
async fn it_reports_signer_failures() {
    let (tools, _) = tools_at(5000);

    let result = tools
        .create_jwt(
            RawPayload::new(),
            SHORT_KEY_DID,
            &BrokenSigner,
            300,
            "ES256K",
        )
        .await;

    match result {
        Err(JwtError::SigningFailed(error)) => {
            assert!(error.to_string().contains("locked"))
        }
        other => panic!("Expected a signing failure, got {other:?}"),
    }
}
