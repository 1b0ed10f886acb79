use super::TestRing;
use crate::dht::Identifier;
use crate::error::Error;
use crate::error::Result;
use crate::measure::MeasureCounter;

#[tokio::test]
async fn test_find_successor_from_every_node() -> Result<()> {
    let ring = TestRing::join_all(6, &[9, 40, 22, 61, 3, 33]).await?;
    for node in ring.nodes.iter() {
        for key in 0..64 {
            let id = Identifier::new(key);
            assert_eq!(
                node.find_successor(id).await?.id.value(),
                ring.expected_successor(key),
                "find_successor({key}) from {}",
                node.id()
            );
            assert_eq!(
                node.find_predecessor(id).await?.id.value(),
                ring.expected_predecessor(key),
                "find_predecessor({key}) from {}",
                node.id()
            );
        }
    }
    Ok(())
}

#[tokio::test]
async fn test_remote_lookups() -> Result<()> {
    let ring = TestRing::join_all(3, &[0, 4, 1]).await?;
    let node0 = ring.node(0);
    let node4 = ring.node(4).node_ref();

    assert_eq!(
        node0.remote_find_successor(&node4, 2.into()).await?.id.value(),
        4
    );
    assert_eq!(
        node0.remote_find_predecessor(&node4, 6.into()).await?.id.value(),
        4
    );
    // fingers of 4 are all 0
    assert_eq!(
        node0
            .remote_closest_preceding_finger(&node4, 3.into())
            .await?
            .id
            .value(),
        0
    );
    let info = node0.remote_topo_info(&node4).await?;
    assert_eq!(info.successor.id.value(), 0);
    assert_eq!(info.predecessor.map(|p| p.id.value()), Some(1));

    // asking itself takes the local path
    let before = node0.measure().get_count(MeasureCounter::RemoteRequest);
    assert_eq!(
        node0
            .remote_find_successor(&node0.node_ref(), 1.into())
            .await?
            .id
            .value(),
        1
    );
    assert_eq!(
        node0.measure().get_count(MeasureCounter::RemoteRequest),
        before
    );
    Ok(())
}

#[tokio::test]
async fn test_closest_preceding_finger_never_overshoots() -> Result<()> {
    let ring = TestRing::join_all(5, &[2, 30, 11, 17, 25, 6]).await?;
    let size = 1u64 << 5;
    for node in ring.nodes.iter() {
        for key in 0..size {
            let id = Identifier::new(key);
            let cpf = node.closest_preceding_finger(id)?;
            if cpf.id != node.id() {
                assert!(
                    node.ring().between(cpf.id, node.id(), id, false, false),
                    "cpf({key}) of {} is {}",
                    node.id(),
                    cpf
                );
            }
        }
    }
    Ok(())
}

#[tokio::test]
async fn test_lookup_measure() -> Result<()> {
    let ring = TestRing::join_all(6, &[1, 20, 40, 60]).await?;
    let node = ring.node(1);
    let measure = node.measure();

    measure.reset();
    assert_eq!(measure.get_count(MeasureCounter::FindSuccessor), 0);

    // 30 is owned by 40, one topology query to the finger pointing to 20
    assert_eq!(node.find_successor(30.into()).await?.id.value(), 40);
    assert_eq!(measure.get_count(MeasureCounter::FindSuccessor), 1);
    assert_eq!(measure.get_count(MeasureCounter::RemoteRequest), 1);

    measure.reset();
    // 10 is owned by the successor, answered locally
    assert_eq!(node.find_successor(10.into()).await?.id.value(), 20);
    let snapshot = measure.snapshot();
    assert_eq!(snapshot.find_successor, 1);
    assert_eq!(snapshot.remote_request, 0);
    Ok(())
}

#[tokio::test]
async fn test_lookup_on_unjoined_node() -> Result<()> {
    let ring = TestRing::new(3);
    let node = ring.prepare_node(5)?;
    assert!(matches!(
        node.find_successor(1.into()).await,
        Err(Error::RingEmpty)
    ));
    assert!(matches!(
        node.find_predecessor(1.into()).await,
        Err(Error::RingEmpty)
    ));
    assert!(matches!(
        node.remote_find_successor(&node.node_ref(), 1.into()).await,
        Err(Error::RingEmpty)
    ));
    assert_eq!(node.measure().get_count(MeasureCounter::FindSuccessor), 0);
    Ok(())
}
