use std::time::Duration;

use super::TestRing;
use crate::error::Error;
use crate::error::Result;
use crate::measure::MeasureCounter;
use crate::message::Message;
use crate::message::QueryForTopoInfoReport;
use crate::message::QueryForTopoInfoSend;
use crate::message::SearchKeyReport;
use crate::node::NodeBuilder;

#[tokio::test]
async fn test_request_timeout_removes_pending() -> Result<()> {
    let ring = TestRing::new(3).rpc_timeout(Duration::from_millis(20));
    let silent = ring.register_silent(2);
    let node = ring.prepare_node(5)?;
    node.transport().connect(&silent)?;

    let ret = node.remote_topo_info(&silent).await;
    assert!(
        matches!(
            &ret,
            Err(Error::Timeout { message, .. }) if *message == "QueryForTopoInfoSend"
        ),
        "{:?}",
        ret
    );
    assert_eq!(node.transport().pending_count(), 0);
    assert_eq!(node.measure().get_count(MeasureCounter::RemoteTimeout), 1);
    Ok(())
}

#[tokio::test]
async fn test_request_retries_on_timeout() -> Result<()> {
    let ring = TestRing::new(3);
    let silent = ring.register_silent(2);
    let node = NodeBuilder::new(5, ring.transport.clone(), ring.directory.clone())
        .ring_bits(3)
        .rpc_timeout(Duration::from_millis(10))
        .rpc_retries(2)
        .build()?;
    node.transport().connect(&silent)?;

    let ret = node.remote_find_successor(&silent, 1.into()).await;
    assert!(matches!(ret, Err(Error::Timeout { .. })));
    assert_eq!(node.measure().get_count(MeasureCounter::RemoteRequest), 3);
    assert_eq!(node.measure().get_count(MeasureCounter::RemoteTimeout), 3);
    Ok(())
}

#[tokio::test]
async fn test_request_without_link_fails() -> Result<()> {
    let ring = TestRing::new(3);
    let a = ring.prepare_node(1)?;
    let b = ring.prepare_node(2)?;
    let ret = a.remote_topo_info(&b.node_ref()).await;
    assert!(matches!(ret, Err(Error::Transport(_))));
    assert_eq!(a.transport().pending_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_unexpected_response() -> Result<()> {
    let ring = TestRing::join_all(3, &[1, 6]).await?;
    let node = ring.node(1);
    let target = ring.node(6).node_ref();

    let report: QueryForTopoInfoReport = node
        .transport()
        .request(&target, Message::QueryForTopoInfoSend(QueryForTopoInfoSend))
        .await?;
    assert_eq!(report.info.successor.id.value(), 1);

    let ret = node
        .transport()
        .request::<SearchKeyReport>(&target, Message::QueryForTopoInfoSend(QueryForTopoInfoSend))
        .await;
    assert!(matches!(
        ret,
        Err(Error::UnexpectedResponse {
            expected: "SearchKeyReport",
            got: "QueryForTopoInfoReport"
        })
    ));
    Ok(())
}

#[tokio::test]
async fn test_dropped_node_stops_answering() -> Result<()> {
    let mut ring = TestRing::new(3).rpc_timeout(Duration::from_millis(200));
    ring.join(1).await?;
    ring.join(6).await?;
    let gone = ring.nodes.pop().unwrap();
    let target = gone.node_ref();
    drop(gone);

    let node = ring.node(1);
    let ret = node.remote_topo_info(&target).await;
    assert!(matches!(ret, Err(Error::Timeout { .. })));
    Ok(())
}
