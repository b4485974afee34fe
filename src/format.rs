use crate::types::TollVoucher;

/// Format a monetary value in Brazilian notation: `1234.5` -> `R$ 1.234,50`
pub fn format_brl(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    // Group the integer part in threes, separated by '.'
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("R$ {}{},{:02}", sign, grouped, frac)
}

/// Escape a value for interpolation into HTML text content
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn text_or_empty(field: Option<&str>) -> String {
    escape_html(field.unwrap_or(""))
}

fn number_or_empty(field: Option<i64>) -> String {
    field.map(|n| n.to_string()).unwrap_or_default()
}

/// Render a voucher as an HTML fragment: headline total + axle count,
/// a detail list for the remaining fields, and a copy button for the total.
///
/// Absent fields render as empty text; this never fails.
pub fn render_result(voucher: &TollVoucher) -> String {
    let total = voucher
        .valor_total_ped
        .map(format_brl)
        .unwrap_or_default();

    format!(
        r#"<div class="resultado">
  <div class="resumo">
    <div class="campo">
      <h5 class="rotulo">Total do Pedágio</h5>
      <h5 class="valor" id="valorTotalPed">{total}</h5>
    </div>
    <div class="campo">
      <h5 class="rotulo">Número de Eixos</h5>
      <h5 class="valor">{eixos}</h5>
    </div>
  </div>
  <div class="detalhes">
    <h5>Detalhes do Pedágio</h5>
    <ul>
      <li><strong>Data de Criação:</strong> {data_criacao}</li>
      <li><strong>Número da Nota Fiscal:</strong> {nota_fiscal}</li>
      <li><strong>Número do Transporte:</strong> {transporte}</li>
      <li><strong>Placa do Cavalo:</strong> {placa}</li>
      <li><strong>Pedido Vale Pedágio:</strong> {pedido}</li>
      <li><strong>Número do Vale Pedágio:</strong> {vale}</li>
      <li><strong>Quantidade de Cupons:</strong> {cupons}</li>
      <li><strong>Itinerário:</strong> {itinerario}</li>
    </ul>
  </div>
  <div class="acoes">
    <button onclick="copiarTotal()">Copiar Total do Pedágio</button>
    <p id="copyMessage" style="display:none;">Valor copiado</p>
  </div>
</div>
<script>
function copiarTotal() {{
  var texto = document.getElementById("valorTotalPed").innerText;
  navigator.clipboard.writeText(texto).then(function() {{
    var msg = document.getElementById("copyMessage");
    msg.style.display = "block";
    setTimeout(function() {{ msg.style.display = "none"; }}, 2000);
  }});
}}
</script>"#,
        total = escape_html(&total),
        eixos = number_or_empty(voucher.numero_eixos),
        data_criacao = text_or_empty(voucher.data_criacao.as_deref()),
        nota_fiscal = text_or_empty(voucher.numero_nota_fiscal.as_deref()),
        transporte = text_or_empty(voucher.numero_transporte.as_deref()),
        placa = text_or_empty(voucher.placa_cavalo.as_deref()),
        pedido = text_or_empty(voucher.pedido_vale_ped.as_deref()),
        vale = text_or_empty(voucher.numero_vale_ped.as_deref()),
        cupons = number_or_empty(voucher.qtde_cupons),
        itinerario = text_or_empty(voucher.itinerario.as_deref()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(1234.5), "R$ 1.234,50");
        assert_eq!(format_brl(0.5), "R$ 0,50");
        assert_eq!(format_brl(12.0), "R$ 12,00");
        assert_eq!(format_brl(999.99), "R$ 999,99");
        assert_eq!(format_brl(1_000_000.0), "R$ 1.000.000,00");
    }

    #[test]
    fn test_format_brl_rounds_to_cents() {
        assert_eq!(format_brl(10.005), "R$ 10,01");
        assert_eq!(format_brl(10.004), "R$ 10,00");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"x" & 'y'</b>"#),
            "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;"
        );
        assert_eq!(escape_html("BR-101 / SP-330"), "BR-101 / SP-330");
    }

    #[test]
    fn test_render_full_voucher() {
        let voucher = TollVoucher {
            valor_total_ped: Some(1234.5),
            numero_eixos: Some(6),
            data_criacao: Some("2024-05-10".to_string()),
            numero_nota_fiscal: Some("NF-889900".to_string()),
            numero_transporte: Some("TR-4455".to_string()),
            placa_cavalo: Some("ABC1D23".to_string()),
            pedido_vale_ped: Some("PVP-777".to_string()),
            numero_vale_ped: Some("VP-123456".to_string()),
            qtde_cupons: Some(4),
            itinerario: Some("Camaçari - Paulínia".to_string()),
        };

        let html = render_result(&voucher);
        assert!(html.contains("R$ 1.234,50"));
        assert!(html.contains(">6<"));
        assert!(html.contains("2024-05-10"));
        assert!(html.contains("NF-889900"));
        assert!(html.contains("TR-4455"));
        assert!(html.contains("ABC1D23"));
        assert!(html.contains("PVP-777"));
        assert!(html.contains("VP-123456"));
        assert!(html.contains(">4<") || html.contains("Cupons:</strong> 4"));
        assert!(html.contains("Camaçari - Paulínia"));
        assert!(html.contains("Copiar Total do Pedágio"));
    }

    #[test]
    fn test_render_missing_total() {
        let voucher = TollVoucher {
            placa_cavalo: Some("XYZ9A87".to_string()),
            ..Default::default()
        };

        // Must not panic; the total slot stays empty
        let html = render_result(&voucher);
        assert!(html.contains(r#"id="valorTotalPed"></h5>"#));
        assert!(html.contains("XYZ9A87"));
        assert!(!html.contains("R$"));
    }

    #[test]
    fn test_render_escapes_vendor_text() {
        let voucher = TollVoucher {
            itinerario: Some("<script>alert(1)</script>".to_string()),
            ..Default::default()
        };

        let html = render_result(&voucher);
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }
}
