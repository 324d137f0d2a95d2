//! Starts the mock Provider on a random port for the integration tests.

use std::net::SocketAddr;

use dmm_core::ClientConfig;
use mock_server::Fault;

/// Run the mock server on its own thread and runtime so both blocking and
/// async tests can use it.
pub fn spawn_server(fault: Option<Fault>) -> SocketAddr {
    let _ = env_logger::builder().is_test(true).try_init();

    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            match fault {
                Some(fault) => mock_server::run_faulty(listener, fault).await,
                None => mock_server::run(listener).await,
            }
        })
        .unwrap();
    });

    addr
}

pub fn config(addr: SocketAddr) -> ClientConfig {
    ClientConfig::new(mock_server::API_ID, mock_server::AFFILIATE_ID)
        .unwrap()
        .with_base_url(&format!("http://{addr}"))
}

/// Credentials the mock server rejects.
pub fn bad_config(addr: SocketAddr) -> ClientConfig {
    ClientConfig::new("wrong-id", mock_server::AFFILIATE_ID)
        .unwrap()
        .with_base_url(&format!("http://{addr}"))
}
