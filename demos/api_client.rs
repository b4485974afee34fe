/// Example HTTP client demonstrating how to call the toll lookup server API
///
/// Run the server first:
/// ```bash
/// cargo run --bin server
/// ```
///
/// Then run this example:
/// ```bash
/// cargo run --example api_client
/// ```

use serde::{Deserialize, Serialize};

use pedagio_rs::{TollVoucher, cnpj, format_brl};

#[derive(Serialize)]
struct ConsultaRequest {
    cnpj: String,
    doc_transporte: String,
}

#[derive(Deserialize, Debug)]
struct ConsultaResponse {
    success: bool,
    data: TollVoucher,
}

#[derive(Deserialize, Debug)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Deserialize, Debug)]
struct MetricsResponse {
    total_requests: u64,
    requests_in_flight: u64,
    uptime_seconds: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = std::env::var("API_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let client = reqwest::Client::new();

    println!("=== Consulta de Pedágio API Client Demo ===\n");

    // 1. Health Check
    println!("1. Checking server health...");
    let health_url = format!("{}/health", base_url);
    let health: HealthResponse = client.get(&health_url).send().await?.json().await?;
    println!("   Server status: {}", health.status);
    println!("   Version: {}\n", health.version);

    // 2. Toll lookup
    println!("2. Querying toll voucher...");
    let consulta_url = format!("{}/api/consulta", base_url);
    let request = ConsultaRequest {
        cnpj: cnpj::ALLOWED[0].to_string(),
        doc_transporte: "12345".to_string(),
    };

    match client.post(&consulta_url).json(&request).send().await {
        Ok(response) => {
            if response.status().is_success() {
                let result: ConsultaResponse = response.json().await?;
                println!("   Success: {}", result.success);
                if let Some(total) = result.data.valor_total_ped {
                    println!("   Total do Pedágio: {}", format_brl(total));
                }
                if let Some(placa) = &result.data.placa_cavalo {
                    println!("   Placa do Cavalo: {}", placa);
                }
                if let Some(itinerario) = &result.data.itinerario {
                    println!("   Itinerário: {}", itinerario);
                }
                println!();
            } else {
                let error_text = response.text().await?;
                println!("   Error: {}\n", error_text);
            }
        }
        Err(e) => {
            println!("   Request failed: {}\n", e);
        }
    }

    // 3. Get Metrics
    println!("3. Getting server metrics...");
    let metrics_url = format!("{}/api/metrics", base_url);
    let metrics: MetricsResponse = client.get(&metrics_url).send().await?.json().await?;
    println!("   Total requests: {}", metrics.total_requests);
    println!("   Requests in flight: {}", metrics.requests_in_flight);
    println!("   Uptime: {} seconds\n", metrics.uptime_seconds);

    println!("=== Demo Complete ===");

    Ok(())
}
