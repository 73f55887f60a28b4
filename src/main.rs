use kastle::config::Config;
use kastle::http::request::Request;
use kastle::http::response::{Response, StatusCode};
use kastle::router::Router;
use kastle::server::Server;

async fn index(_req: Request) -> anyhow::Result<Response> {
    Ok(Response::ok("Hello from Kastle\n"))
}

async fn about(_req: Request) -> anyhow::Result<Response> {
    Ok(Response::ok("OK"))
}

async fn echo(mut req: Request) -> anyhow::Result<Response> {
    let content_type = req
        .header("Content-Type")
        .unwrap_or("application/octet-stream")
        .to_string();

    Ok(Response::builder(StatusCode::Ok)
        .header("Content-Type", content_type)
        .body(req.into_body())
        .build())
}

async fn users(_req: Request) -> anyhow::Result<Response> {
    Ok(Response::builder(StatusCode::Ok)
        .header("Content-Type", "application/json")
        .body(r#"[{"name":"kyomi"}]"#)
        .build())
}

async fn create_user(req: Request) -> anyhow::Result<Response> {
    Ok(Response::builder(StatusCode::Created)
        .header("Content-Type", "application/json")
        .header("Location", "/api/users")
        .body(req.into_body())
        .build())
}

async fn clear_users(_req: Request) -> anyhow::Result<Response> {
    Ok(Response::new(StatusCode::NoContent, Vec::<u8>::new()))
}

fn routes() -> anyhow::Result<Router> {
    let mut router = Router::new();
    router.get("/", index)?;
    router.get("/about", about)?;
    router.post("/echo", echo)?;

    let mut api = Router::new();
    api.get("/users", users)?;
    api.post("/users", create_user)?;
    api.delete("/users", clear_users)?;
    router.add_router("/api", &api)?;

    Ok(router)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kastle=info".into()),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;
    let (host, port) = (cfg.host.clone(), cfg.port);
    let server = Server::with_config(routes()?, cfg);

    tokio::select! {
        res = server.serve(&host, port) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
