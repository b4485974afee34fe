use serde::{Deserialize, Serialize};

/// Token endpoint response
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// Toll lookup request body sent to the query endpoint
#[derive(Debug, Clone, Serialize)]
pub struct TollQuery {
    #[serde(rename = "CNPJ")]
    pub cnpj: String,
    #[serde(rename = "DOC_TRANSPORTE")]
    pub doc_transporte: String,
}

/// Envelope returned by the query endpoint: either a `body` with the
/// voucher data or an `error` message from the vendor
#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub body: Option<TollVoucher>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Toll voucher record for a single transport document.
///
/// Every field is optional: the vendor omits fields it has no data for,
/// and an incomplete voucher is still rendered.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TollVoucher {
    #[serde(rename = "ValorTotalPed", default)]
    pub valor_total_ped: Option<f64>,
    #[serde(rename = "NumeroEixos", default)]
    pub numero_eixos: Option<i64>,
    #[serde(rename = "DataCriacao", default)]
    pub data_criacao: Option<String>,
    #[serde(rename = "NumeroNotaFiscal", default)]
    pub numero_nota_fiscal: Option<String>,
    #[serde(rename = "NumeroTransporte", default)]
    pub numero_transporte: Option<String>,
    #[serde(rename = "PlacaCavalo", default)]
    pub placa_cavalo: Option<String>,
    #[serde(rename = "PedidoValePed", default)]
    pub pedido_vale_ped: Option<String>,
    #[serde(rename = "NumeroValePed", default)]
    pub numero_vale_ped: Option<String>,
    #[serde(rename = "QtdeCupons", default)]
    pub qtde_cupons: Option<i64>,
    #[serde(rename = "Itinerario", default)]
    pub itinerario: Option<String>,
}

/// CNPJs authorized to query the pipeline
pub mod cnpj {
    pub const ALLOWED: [&str; 5] = [
        "17799438001156",
        "17799438000346",
        "17799438000508",
        "17799438000184",
        "17799438001318",
    ];

    pub fn is_allowed(cnpj: &str) -> bool {
        ALLOWED.contains(&cnpj)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_success_envelope() {
        let raw = r#"{
            "body": {
                "ValorTotalPed": 1234.5,
                "NumeroEixos": 6,
                "DataCriacao": "2024-05-10",
                "PlacaCavalo": "ABC1D23"
            }
        }"#;
        let parsed: QueryResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.error.is_none());

        let voucher = parsed.body.unwrap();
        assert_eq!(voucher.valor_total_ped, Some(1234.5));
        assert_eq!(voucher.numero_eixos, Some(6));
        assert_eq!(voucher.placa_cavalo.as_deref(), Some("ABC1D23"));
        // Fields the vendor omitted stay None
        assert!(voucher.itinerario.is_none());
        assert!(voucher.qtde_cupons.is_none());
    }

    #[test]
    fn test_parse_error_envelope() {
        let raw = r#"{"error": "Documento não encontrado"}"#;
        let parsed: QueryResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.body.is_none());
        assert_eq!(parsed.error.as_deref(), Some("Documento não encontrado"));
    }

    #[test]
    fn test_query_serializes_vendor_field_names() {
        let query = TollQuery {
            cnpj: "17799438001156".to_string(),
            doc_transporte: "12345".to_string(),
        };
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["CNPJ"], "17799438001156");
        assert_eq!(json["DOC_TRANSPORTE"], "12345");
    }

    #[test]
    fn test_cnpj_allow_list() {
        assert!(cnpj::is_allowed("17799438001156"));
        assert!(cnpj::is_allowed("17799438001318"));
        assert!(!cnpj::is_allowed("00000000000000"));
        assert!(!cnpj::is_allowed(""));
    }
}
