//! Extraction throughput for a full listing page and a detail page

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use indiamart_scraper_lib::domain::ProductRecord;
use indiamart_scraper_lib::infrastructure::parsing::{
    DetailParseContext, ParseContext, ProductDetailParser, ProductListParser,
};

fn listing_page(cards: usize) -> String {
    let body: String = (0..cards)
        .map(|i| {
            format!(
                r#"<div class="card">
                     <div class="producttitle"><a class="cardlinks" href="/proddetail/led-{i}.html">LED Light {i}</a></div>
                     <p class="price">₹{i}/Piece</p>
                     <div class="companyname"><a class="cardlinks">Supplier {i}</a></div>
                     <div class="newLocationUi"><span>Pune</span><span>Verified</span></div>
                   </div>"#
            )
        })
        .collect();
    format!(r#"<html><body><div class="listingCardContainer">{body}</div></body></html>"#)
}

const DETAIL_PAGE: &str = r#"<html><body>
  <div class="isq-container"><table>
    <tr><td class="tdwdt">Wattage</td><td class="tdwdt1"><span class="datatooltip">18 W</span></td></tr>
    <tr><td class="tdwdt">Brand</td><td class="tdwdt1"><span class="datatooltip">Philips</span></td></tr>
    <tr><td class="tdwdt">IP Rating</td><td class="tdwdt1"><span class="datatooltip">IP66</span></td></tr>
    <tr><td class="tdwdt">Usage/Application</td><td class="tdwdt1"><span class="datatooltip">Outdoor</span></td></tr>
    <tr><td class="tdwdt">Country of Origin</td><td class="tdwdt1"><span class="datatooltip">Made in India</span></td></tr>
  </table></div>
  <div id="descp2"><div class="pro-descN"><p>Flood light with die-cast housing.</p><ul><li>Waterproof</li></ul></div></div>
  <span class="fs10">Member: 12 yrs</span>
  <div id="slr_rtng"><span class="bo color">4.1</span><span class="tcund">(512)</span></div>
</body></html>"#;

fn bench_listing(c: &mut Criterion) {
    let parser = ProductListParser::new().expect("default selectors compile");
    let context = ParseContext::new(1, "https://dir.indiamart.com/search.mp?ss=led+lights&page_no=1");

    let mut group = c.benchmark_group("listing_page");
    for cards in [10, 50, 100] {
        let body = listing_page(cards);
        group.bench_with_input(BenchmarkId::from_parameter(cards), &body, |b, body| {
            b.iter(|| parser.parse_page(black_box(body), &context));
        });
    }
    group.finish();
}

fn bench_detail(c: &mut Criterion) {
    let parser = ProductDetailParser::new().expect("default selectors compile");
    let context = DetailParseContext::new("https://www.indiamart.com/proddetail/led-1.html", 0);

    c.bench_function("detail_page", |b| {
        b.iter(|| {
            let mut record = ProductRecord::default();
            parser.parse_into(black_box(DETAIL_PAGE), &context, &mut record);
            record
        });
    });
}

criterion_group!(benches, bench_listing, bench_detail);
criterion_main!(benches);
