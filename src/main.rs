use std::env;

use anyhow::Result;
use pedagio_rs::{Credentials, PedagioClient, cnpj, format_brl, render_result};

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <cnpj> <doc_transporte> [text|html]", args[0]);
        eprintln!("  cnpj: one of {}", cnpj::ALLOWED.join(", "));
        eprintln!("  doc_transporte: transport document number");
        eprintln!("  output: text (default) or html");
        eprintln!();
        eprintln!("Credentials come from PEDAGIO_API_KEY, PEDAGIO_CLIENT_ID");
        eprintln!("and PEDAGIO_CLIENT_SECRET.");
        std::process::exit(1);
    }

    let cnpj_value = args[1].trim();
    let doc_transporte = args[2].trim();

    if !cnpj::is_allowed(cnpj_value) {
        eprintln!("Error: CNPJ {} is not in the authorized list", cnpj_value);
        eprintln!("Allowed: {}", cnpj::ALLOWED.join(", "));
        std::process::exit(1);
    }
    if doc_transporte.is_empty() {
        eprintln!("Error: DOC_TRANSPORTE must not be empty");
        std::process::exit(1);
    }

    let output = args.get(3).map(|s| s.as_str()).unwrap_or("text");

    let credentials = Credentials::from_env()?;
    let client = PedagioClient::new(credentials)?;

    println!("Querying toll voucher for document {}...", doc_transporte);
    let voucher = client.lookup(cnpj_value, doc_transporte).await?;

    match output {
        "html" => println!("{}", render_result(&voucher)),
        _ => {
            let text = |field: &Option<String>| field.as_deref().unwrap_or("-").to_string();

            println!("\nTotal do Pedágio: {}",
                voucher.valor_total_ped.map(format_brl).unwrap_or_else(|| "-".to_string()));
            println!("Número de Eixos: {}",
                voucher.numero_eixos.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string()));
            println!("Data de Criação: {}", text(&voucher.data_criacao));
            println!("Número da Nota Fiscal: {}", text(&voucher.numero_nota_fiscal));
            println!("Número do Transporte: {}", text(&voucher.numero_transporte));
            println!("Placa do Cavalo: {}", text(&voucher.placa_cavalo));
            println!("Pedido Vale Pedágio: {}", text(&voucher.pedido_vale_ped));
            println!("Número do Vale Pedágio: {}", text(&voucher.numero_vale_ped));
            println!("Quantidade de Cupons: {}",
                voucher.qtde_cupons.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string()));
            println!("Itinerário: {}", text(&voucher.itinerario));
        }
    }

    Ok(())
}
