//! 主应用程序入口
//!
//! 加载配置，建立数据库与缓存连接，装配各层服务后启动 HTTP 服务。

use std::sync::Arc;

use application::{
    MemberService, MemberServiceDependencies, RoomService, RoomServiceDependencies,
};
use config::AppConfig;
use domain::TokenIssuer;
use infrastructure::{
    create_pg_pool, BcryptPasswordHasher, PostgresMemberRepository, PostgresRoomRepository,
    RedisCredentialCache, RetryPolicy,
};
use tracing_subscriber::EnvFilter;
use web_api::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // 配置启动时加载一次，之后只读
    let config = AppConfig::from_env_with_defaults();
    config.validate()?;

    tracing::info!(
        database = %config.database.url.split('@').next_back().unwrap_or("unknown"),
        "connecting to database"
    );
    let pg_pool = create_pg_pool(&config.database).await?;

    // 运行迁移
    sqlx::migrate!("../../migrations").run(&pg_pool).await?;

    let retry = RetryPolicy::from_config(&config.retry);

    let member_repository = Arc::new(PostgresMemberRepository::new(pg_pool.clone(), retry.clone()));
    let room_repository = Arc::new(PostgresRoomRepository::new(pg_pool, retry.clone()));

    tracing::info!("connecting to redis credential cache");
    let credential_cache = Arc::new(
        RedisCredentialCache::connect(&config.redis.url, retry)
            .await
            .map_err(|err| anyhow::anyhow!("redis connection failed: {err}"))?,
    );

    let password_hasher = Arc::new(BcryptPasswordHasher::new(config.security.bcrypt_cost));
    let token_issuer = Arc::new(TokenIssuer::new(
        &config.jwt.secret,
        config.jwt.expiration_minutes,
    ));

    let member_service = Arc::new(MemberService::new(MemberServiceDependencies {
        member_repository: member_repository.clone(),
        credential_cache,
        password_hasher,
        token_issuer: token_issuer.clone(),
    }));

    let room_service = Arc::new(RoomService::new(RoomServiceDependencies {
        room_repository,
        member_repository,
    }));

    let state = AppState::new(member_service, room_service, token_issuer);
    let app = router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!(%addr, "chat service listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
