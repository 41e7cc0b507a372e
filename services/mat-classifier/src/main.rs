//! mat-classifier 服务入口

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    matc_bootstrap::run("config", mat_classifier::build_app).await
}
