//! Signature V1 (HMAC-SHA1) computation for STS requests.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::error::{Result, StsError};

type HmacSha1 = Hmac<Sha1>;

/// Name of the parameter carrying the computed signature.
pub const SIGNATURE_PARAM: &str = "Signature";

/// Percent-encodes a string with the escaping the STS canonicalizer expects.
///
/// This is URI-component encoding: `A-Z`, `a-z`, `0-9` and `- _ . ! ~ ' ( )`
/// pass through, every other UTF-8 byte becomes `%XX` (uppercase hex), and a
/// space becomes `%20`. The one divergence is `*`, which is escaped to `%2A`
/// because the service treats it as reserved.
pub fn percent_encode(s: &str) -> String {
    let mut encoded = String::with_capacity(s.len() * 3);
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'\''
            | b'('
            | b')' => encoded.push(byte as char),
            _ => {
                encoded.push('%');
                encoded.push(hex_digit(byte >> 4));
                encoded.push(hex_digit(byte & 0x0F));
            }
        }
    }
    encoded
}

fn hex_digit(nibble: u8) -> char {
    match nibble {
        0..=9 => (b'0' + nibble) as char,
        _ => (b'A' + nibble - 10) as char,
    }
}

/// Builds the canonicalized query string: `k1=v1&k2=v2...` in byte-wise key
/// order, each key and value percent-encoded. `Signature` is never included.
pub fn canonicalize(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .filter(|(k, _)| k.as_str() != SIGNATURE_PARAM)
        .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Builds `METHOD&%2F&{percent_encode(canonical_query)}`.
pub fn string_to_sign(http_method: &str, params: &BTreeMap<String, String>) -> String {
    format!(
        "{}&{}&{}",
        http_method.to_ascii_uppercase(),
        percent_encode("/"),
        percent_encode(&canonicalize(params))
    )
}

/// Computes the base64 HMAC-SHA1 signature of a parameter set.
///
/// The HMAC key is `{access_key_secret}&`; the trailing ampersand is part of
/// the protocol.
pub fn sign(
    http_method: &str,
    params: &BTreeMap<String, String>,
    access_key_secret: &str,
) -> Result<String> {
    let string_to_sign = string_to_sign(http_method, params);

    let signing_key = format!("{}&", access_key_secret);
    let mut mac = HmacSha1::new_from_slice(signing_key.as_bytes())
        .map_err(|e| StsError::Signature(format!("HMAC key error: {}", e)))?;
    mac.update(string_to_sign.as_bytes());

    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn golden_params() -> BTreeMap<String, String> {
        [
            ("Action", "AssumeRole"),
            ("RoleArn", "acs:ram::123:role/test"),
            ("RoleSessionName", "app"),
            ("DurationSeconds", "3600"),
            ("Format", "JSON"),
            ("Version", "2015-04-01"),
            ("AccessKeyId", "AKIDexample"),
            ("SignatureMethod", "HMAC-SHA1"),
            ("SignatureVersion", "1.0"),
            ("SignatureNonce", "7d1e4c2a-5b3f-4e8a-9c6d-0f1a2b3c4d5e"),
            ("Timestamp", "2024-01-01T00:00:00Z"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn percent_encode_unreserved_chars() {
        assert_eq!(percent_encode("abcXYZ019"), "abcXYZ019");
        assert_eq!(percent_encode("-._~"), "-._~");
        assert_eq!(percent_encode("!'()"), "!'()");
    }

    #[test]
    fn percent_encode_asterisk() {
        assert_eq!(percent_encode("*"), "%2A");
        assert_eq!(
            percent_encode("acs:oss:*:*:bucket/*"),
            "acs%3Aoss%3A%2A%3A%2A%3Abucket%2F%2A"
        );
    }

    #[test]
    fn percent_encode_reserved_chars() {
        assert_eq!(percent_encode("hello world"), "hello%20world");
        assert_eq!(percent_encode("/"), "%2F");
        assert_eq!(percent_encode("="), "%3D");
        assert_eq!(percent_encode("&"), "%26");
        assert_eq!(percent_encode("+"), "%2B");
        assert_eq!(percent_encode("{\"a\":[1]}"), "%7B%22a%22%3A%5B1%5D%7D");
    }

    #[test]
    fn percent_encode_matches_uri_component_for_all_ascii() {
        // encodeURIComponent over U+0000..=U+007F, with `*` then replaced by `%2A`.
        const EXPECTED: &str = "%00%01%02%03%04%05%06%07%08%09%0A%0B%0C%0D%0E%0F%10%11%12%13%14%15%16%17%18%19%1A%1B%1C%1D%1E%1F%20!%22%23%24%25%26'()%2A%2B%2C-.%2F0123456789%3A%3B%3C%3D%3E%3F%40ABCDEFGHIJKLMNOPQRSTUVWXYZ%5B%5C%5D%5E_%60abcdefghijklmnopqrstuvwxyz%7B%7C%7D~%7F";
        let all_ascii: String = (0u8..0x80).map(char::from).collect();
        assert_eq!(percent_encode(&all_ascii), EXPECTED);

        for byte in 0u8..0x80 {
            let single = char::from(byte).to_string();
            let encoded = percent_encode(&single);
            if byte == b'*' {
                assert_eq!(encoded, "%2A");
            } else if byte.is_ascii_alphanumeric() || b"-_.!~'()".contains(&byte) {
                assert_eq!(encoded, single);
            } else {
                assert_eq!(encoded, format!("%{:02X}", byte));
            }
        }
    }

    #[test]
    fn percent_encode_reserved_punctuation() {
        assert_eq!(percent_encode("@"), "%40");
        assert_eq!(percent_encode("#"), "%23");
        assert_eq!(percent_encode("$"), "%24");
        assert_eq!(percent_encode(","), "%2C");
        assert_eq!(percent_encode(";"), "%3B");
        assert_eq!(percent_encode("?"), "%3F");
        assert_eq!(percent_encode("%"), "%25");
        assert_eq!(percent_encode("100%*"), "100%25%2A");
    }

    #[test]
    fn percent_encode_multibyte() {
        assert_eq!(percent_encode("中文"), "%E4%B8%AD%E6%96%87");
    }

    #[test]
    fn canonicalize_sorts_keys_bytewise() {
        let params: BTreeMap<String, String> = [("b", "2"), ("A", "1"), ("a", "3")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        // Uppercase sorts before lowercase in byte order.
        assert_eq!(canonicalize(&params), "A=1&a=3&b=2");
    }

    #[test]
    fn canonicalize_is_stable() {
        let params = golden_params();
        let first = canonicalize(&params);
        let resorted: BTreeMap<String, String> = params.clone().into_iter().collect();
        assert_eq!(first, canonicalize(&resorted));
        assert_eq!(first, canonicalize(&params));
    }

    #[test]
    fn canonicalize_skips_signature() {
        let mut params = golden_params();
        let without = canonicalize(&params);
        params.insert(SIGNATURE_PARAM.to_string(), "abc=".to_string());
        assert_eq!(canonicalize(&params), without);
    }

    #[test]
    fn golden_string_to_sign() {
        let expected = "POST&%2F&AccessKeyId%3DAKIDexample%26Action%3DAssumeRole\
            %26DurationSeconds%3D3600%26Format%3DJSON\
            %26RoleArn%3Dacs%253Aram%253A%253A123%253Arole%252Ftest\
            %26RoleSessionName%3Dapp%26SignatureMethod%3DHMAC-SHA1\
            %26SignatureNonce%3D7d1e4c2a-5b3f-4e8a-9c6d-0f1a2b3c4d5e\
            %26SignatureVersion%3D1.0%26Timestamp%3D2024-01-01T00%253A00%253A00Z\
            %26Version%3D2015-04-01";
        assert_eq!(string_to_sign("post", &golden_params()), expected);
    }

    #[test]
    fn golden_signature() {
        let sig = sign("POST", &golden_params(), "secret").unwrap();
        assert_eq!(sig, "sCRRmf4ju9aWBQ7FokXlIARrs/Q=");
    }

    #[test]
    fn sign_is_deterministic() {
        let params = golden_params();
        let sig1 = sign("POST", &params, "testsecret").unwrap();
        let sig2 = sign("POST", &params, "testsecret").unwrap();
        assert_eq!(sig1, sig2);
    }

    #[test]
    fn single_parameter_change_changes_signature() {
        let base = golden_params();
        let base_sig = sign("POST", &base, "secret").unwrap();

        let mut changed = base.clone();
        changed.insert("DurationSeconds".to_string(), "3601".to_string());
        assert_ne!(canonicalize(&base), canonicalize(&changed));
        assert_ne!(base_sig, sign("POST", &changed, "secret").unwrap());

        let mut added = base.clone();
        added.insert("Policy".to_string(), "{}".to_string());
        assert_ne!(base_sig, sign("POST", &added, "secret").unwrap());

        let mut removed = base.clone();
        removed.remove("RoleSessionName");
        assert_ne!(base_sig, sign("POST", &removed, "secret").unwrap());
    }

    #[test]
    fn boundary_shift_changes_canonical_string() {
        // Naive concatenation of "ab"+"c" and "a"+"bc" would collide.
        let one: BTreeMap<String, String> = [("ab".to_string(), "c".to_string())].into();
        let two: BTreeMap<String, String> = [("a".to_string(), "bc".to_string())].into();
        assert_ne!(canonicalize(&one), canonicalize(&two));
    }

    #[test]
    fn policy_with_wildcards_golden() {
        let mut params = golden_params();
        params.insert(
            "Policy".to_string(),
            r#"{"Version":"1","Statement":[{"Effect":"Allow","Action":["oss:GetObject"],"Resource":["acs:oss:*:*:bucket/*"]}]}"#
                .to_string(),
        );
        let sig = sign("POST", &params, "secret").unwrap();
        assert_eq!(sig, "gy5u7oEZqxxKERT2NSAVnIumbps=");
    }

    #[test]
    fn different_secrets_differ() {
        let params = golden_params();
        assert_ne!(
            sign("POST", &params, "secret1").unwrap(),
            sign("POST", &params, "secret2").unwrap()
        );
    }

    #[test]
    fn different_methods_differ() {
        let params = golden_params();
        assert_ne!(
            sign("POST", &params, "secret").unwrap(),
            sign("GET", &params, "secret").unwrap()
        );
    }

    #[test]
    fn signature_is_base64_sha1_digest() {
        let mut params = BTreeMap::new();
        params.insert("Action".to_string(), "Test".to_string());
        let sig = sign("POST", &params, "key").unwrap();
        assert_eq!(sig, "fQ07Q06hzazJuI9yn7EvKN6/pAQ=");
        assert_eq!(BASE64.decode(&sig).unwrap().len(), 20);
    }
}
